use thiserror::Error;

use crate::codec::common::text::byte_unit;

/// Errors returned by downlink encoding and decoding.
///
/// # Examples
/// ```
/// use eloc_lora_core::DownlinkError;
///
/// let err = DownlinkError::UnknownFPort { channel: 9 };
/// assert_eq!(err.to_string(), "unknown FPort");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownlinkError {
    #[error("unknown FPort")]
    UnknownFPort { channel: u8 },
    #[error("unknown color: {name}")]
    UnknownColor { name: String },
    #[error("unknown color index: {index}")]
    UnknownColorIndex { index: u8 },
    #[error("malformed buffer: need {needed} {}, got {actual}", byte_unit(.needed))]
    MalformedBuffer { needed: usize, actual: usize },
}
