//! Payload codecs.
//!
//! Each direction follows a layered structure:
//! - `layout`: byte offsets, ranges and constants (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `encoder`: the inverse of `parser`
//! - `error`: explicit, actionable errors
//!
//! Codecs are pure and contain no I/O; callers own framing and delivery.

pub(crate) mod common;
pub mod downlink;
pub mod uplink;
