//! Downlink (server -> node) payloads.
//!
//! A downlink is three bytes on a fixed channel: a color index into
//! `layout::COLOR_NAMES` followed by a little-endian `u16` counter. Decoding
//! recovers the color only. Unknown color names are rejected when encoding
//! instead of being written as a sentinel index.

pub mod command;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;

pub use command::{Color, DownlinkCommand};
pub use encoder::{EncodedDownlink, encode_downlink};
pub use parser::{DecodedDownlink, DownlinkData, decode_downlink};
