//! Uplink (node -> server) payloads.
//!
//! Two dialects are routed by channel. The tagged dialect starts with a header
//! byte whose high nibble is the message tag and low nibble the format
//! version; the version selects a field layout from `layout::TAGGED_LAYOUTS`.
//! The counter dialect is a fixed three-byte legacy payload.
//!
//! Required lengths are checked before any field is read, so a declared event
//! count larger than the payload is reported as a malformed buffer and never
//! yields partial data. Unknown tags are passed through as
//! `MessageVariant::UnknownMessage` without an error.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use encoder::{encode_counter, encode_event, encode_status};
pub use parser::{Decoded, UplinkWarning, decode_uplink};
