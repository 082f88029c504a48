use thiserror::Error;

use crate::codec::common::text::byte_unit;

/// Errors returned by uplink decoding and encoding.
///
/// The `Display` text is what ends up in a result's `errors` list.
///
/// # Examples
/// ```
/// use eloc_lora_core::UplinkError;
///
/// let err = UplinkError::MalformedBuffer { needed: 16, actual: 12 };
/// assert_eq!(err.to_string(), "malformed buffer: need 16 bytes, got 12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UplinkError {
    #[error("unknown channel")]
    UnknownChannel { channel: u8 },
    #[error("malformed buffer: need {needed} {}, got {actual}", byte_unit(.needed))]
    MalformedBuffer { needed: usize, actual: usize },
    #[error("too many events: {count} (max {max})")]
    TooManyEvents { count: usize, max: usize },
    #[error("invalid event label {label:?}: expected {expected} Latin-1 characters")]
    InvalidLabel { label: String, expected: usize },
    #[error("invalid message version: {version} (max {max})")]
    InvalidVersion { version: u8, max: u8 },
}
