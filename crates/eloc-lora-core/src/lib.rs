//! Payload codec for ELOC acoustic sensor nodes on LoRaWAN.
//!
//! The node reports its status and classifier detections as small binary
//! uplinks; the server sends three-byte downlinks back. This crate turns
//! payload bytes plus their channel (FPort) into typed records and back.
//! Decoding is byte-oriented and side-effect free: every call is independent,
//! takes borrowed bytes, and returns errors as data.
//!
//! Invariants:
//! - A decode yields either a message (plus warnings) or errors, never both.
//! - Required lengths are checked before fields are read; truncated payloads
//!   are reported as malformed, never partially decoded.
//! - Multi-byte uplink fields are big-endian; the downlink counter is
//!   little-endian.
//!
//! # Examples
//! ```
//! use eloc_lora_core::{DownlinkCommand, decode_uplink, encode_downlink};
//!
//! let result = decode_uplink(&[0x00, 0, 0, 0, 0, 0x65, 0x53, 0xF1, 0x00, 77, 3], 1);
//! assert!(result.errors.is_empty());
//!
//! let encoded = encode_downlink(&DownlinkCommand::new("green", 300));
//! assert_eq!(encoded.data.unwrap().bytes, vec![1, 44, 1]);
//! ```

use serde::{Deserialize, Serialize};

mod codec;
mod config;
pub mod format;
mod message;

pub use codec::downlink::{
    Color, DecodedDownlink, DownlinkCommand, DownlinkData, EncodedDownlink,
    error::DownlinkError,
};
pub use codec::uplink::{
    Decoded, UplinkWarning, encode_counter, encode_event, encode_status, error::UplinkError,
};
pub use config::{CodecConfig, ConfigError, UplinkChannels};
pub use message::{
    CounterReport, Event, EventReport, MessageVariant, RawMessage, RecordingState, StatusReport,
};

/// Fixed channel for downlinks.
pub const DOWNLINK_CHANNEL: u8 = codec::downlink::layout::DOWNLINK_CHANNEL;
/// Width of an event label in bytes.
pub const EVENT_LABEL_LEN: usize = codec::uplink::layout::LABEL_LEN;

/// Outcome of decoding one uplink.
///
/// # Examples
/// ```
/// use eloc_lora_core::decode_uplink;
///
/// let result = decode_uplink(&[0x00], 99);
/// assert!(result.data.is_none());
/// assert_eq!(result.errors, vec!["unknown channel".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Decoded message; `null` when `errors` is non-empty.
    pub data: Option<MessageVariant>,
    /// Recoverable anomalies.
    pub warnings: Vec<String>,
    /// Reasons the payload could not be decoded.
    pub errors: Vec<String>,
}

/// Outcome of encoding one downlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResult {
    pub data: Option<EncodedDownlink>,
    pub errors: Vec<String>,
}

/// Outcome of decoding one downlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlinkDecodeResult {
    pub data: Option<DownlinkData>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl DecodeResult {
    fn from_outcome(outcome: Result<Decoded, UplinkError>) -> Self {
        match outcome {
            Ok(decoded) => Self {
                data: Some(decoded.message),
                warnings: decoded.warnings.iter().map(ToString::to_string).collect(),
                errors: Vec::new(),
            },
            Err(err) => Self {
                data: None,
                warnings: Vec::new(),
                errors: vec![err.to_string()],
            },
        }
    }
}

impl EncodeResult {
    fn from_outcome(outcome: Result<EncodedDownlink, DownlinkError>) -> Self {
        match outcome {
            Ok(encoded) => Self {
                data: Some(encoded),
                errors: Vec::new(),
            },
            Err(err) => Self {
                data: None,
                errors: vec![err.to_string()],
            },
        }
    }
}

impl DownlinkDecodeResult {
    fn from_outcome(outcome: Result<DecodedDownlink, DownlinkError>) -> Self {
        match outcome {
            Ok(decoded) => Self {
                data: Some(decoded.data),
                warnings: decoded
                    .unexpected_len
                    .map(|len| {
                        format!(
                            "unexpected payload length {len}, expected {}",
                            codec::downlink::layout::PAYLOAD_LEN
                        )
                    })
                    .into_iter()
                    .collect(),
                errors: Vec::new(),
            },
            Err(err) => Self {
                data: None,
                warnings: Vec::new(),
                errors: vec![err.to_string()],
            },
        }
    }
}

/// Codec bound to a channel configuration.
///
/// # Examples
/// ```
/// use eloc_lora_core::{Codec, CodecConfig, UplinkChannels};
///
/// let codec = Codec::new(CodecConfig {
///     channels: UplinkChannels { tagged: 10, counter: 11 },
/// })?;
/// let result = codec.decode_uplink(&[0x2A, 0x07, 0xD0], 11);
/// assert!(result.errors.is_empty());
/// # Ok::<(), eloc_lora_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Typed uplink decode.
    pub fn try_decode_uplink(&self, bytes: &[u8], channel: u8) -> Result<Decoded, UplinkError> {
        codec::uplink::decode_uplink(bytes, channel, &self.config.channels)
    }

    pub fn decode_uplink(&self, bytes: &[u8], channel: u8) -> DecodeResult {
        DecodeResult::from_outcome(self.try_decode_uplink(bytes, channel))
    }

    pub fn encode_downlink(&self, command: &DownlinkCommand) -> EncodeResult {
        EncodeResult::from_outcome(codec::downlink::encode_downlink(command))
    }

    pub fn decode_downlink(&self, bytes: &[u8], channel: u8) -> DownlinkDecodeResult {
        DownlinkDecodeResult::from_outcome(codec::downlink::decode_downlink(bytes, channel))
    }
}

/// Decode an uplink with the default channel map.
pub fn decode_uplink(bytes: &[u8], channel: u8) -> DecodeResult {
    Codec::default().decode_uplink(bytes, channel)
}

/// Encode a downlink command for [`DOWNLINK_CHANNEL`].
pub fn encode_downlink(command: &DownlinkCommand) -> EncodeResult {
    Codec::default().encode_downlink(command)
}

/// Decode a downlink payload; only the color is recovered.
pub fn decode_downlink(bytes: &[u8], channel: u8) -> DownlinkDecodeResult {
    Codec::default().decode_downlink(bytes, channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_bytes(timestamp: u64, battery: u8, state: u8) -> Vec<u8> {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&timestamp.to_be_bytes());
        bytes.extend_from_slice(&[battery, state]);
        bytes
    }

    #[test]
    fn decode_uplink_status() {
        let result = decode_uplink(&status_bytes(1_700_000_000, 77, 3), 1);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.data,
            Some(MessageVariant::StatusReport(StatusReport {
                version: 0,
                timestamp: 1_700_000_000,
                battery_percent: 77,
                recording_state: RecordingState::RecordOnDetectOn,
            }))
        );
    }

    #[test]
    fn decode_uplink_malformed_has_no_data() {
        let mut bytes = vec![0x10];
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.push(2);
        bytes.extend_from_slice(b"eleph");
        let result = decode_uplink(&bytes, 1);
        assert!(result.data.is_none());
        assert_eq!(
            result.errors,
            vec!["malformed buffer: need 22 bytes, got 15".to_string()]
        );
    }

    #[test]
    fn decode_uplink_unknown_channel() {
        let result = decode_uplink(&status_bytes(1, 2, 3), 99);
        assert!(result.data.is_none());
        assert!(result.warnings.is_empty());
        assert_eq!(result.errors, vec!["unknown channel".to_string()]);
    }

    #[test]
    fn decode_uplink_unknown_tag_is_not_an_error() {
        let result = decode_uplink(&[0xF0, 1, 2], 1);
        assert!(result.errors.is_empty());
        assert!(matches!(
            result.data,
            Some(MessageVariant::UnknownMessage { tag: 0x0F, .. })
        ));
    }

    #[test]
    fn decode_uplink_unknown_tag_with_future_version_has_no_warnings() {
        let result = decode_uplink(&[0x21, 0xDE, 0xAD], 1);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(matches!(
            result.data,
            Some(MessageVariant::UnknownMessage { tag: 2, version: 1, .. })
        ));
    }

    #[test]
    fn decode_uplink_empty_tagged_payload() {
        let result = decode_uplink(&[], 1);
        assert_eq!(
            result.errors,
            vec!["malformed buffer: need 1 byte, got 0".to_string()]
        );
    }

    #[test]
    fn decode_uplink_result_json_shape() {
        let result = decode_uplink(&[], 99);
        let value = serde_json::to_value(&result).expect("result json");
        assert!(value["data"].is_null());
        assert_eq!(value["errors"][0], "unknown channel");
        assert!(value["warnings"].as_array().expect("warnings").is_empty());
    }

    #[test]
    fn encode_downlink_unknown_color_is_data() {
        let result = encode_downlink(&DownlinkCommand::new("purple", 1));
        assert!(result.data.is_none());
        assert_eq!(result.errors, vec!["unknown color: purple".to_string()]);
    }

    #[test]
    fn decode_downlink_green() {
        let result = decode_downlink(&[1, 44, 1], DOWNLINK_CHANNEL);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.data, Some(DownlinkData { color: Color::Green }));
        let value = serde_json::to_value(&result).expect("result json");
        assert_eq!(value["data"]["color"], "green");
    }

    #[test]
    fn decode_downlink_unknown_fport() {
        let result = decode_downlink(&[1, 44, 1], 1);
        assert!(result.data.is_none());
        assert_eq!(result.errors, vec!["unknown FPort".to_string()]);
    }

    #[test]
    fn decode_downlink_short_payload_warns() {
        let result = decode_downlink(&[2], DOWNLINK_CHANNEL);
        assert_eq!(result.data, Some(DownlinkData { color: Color::Blue }));
        assert_eq!(
            result.warnings,
            vec!["unexpected payload length 1, expected 3".to_string()]
        );
    }

    #[test]
    fn codec_rejects_invalid_config() {
        let config = CodecConfig {
            channels: UplinkChannels {
                tagged: 5,
                counter: 5,
            },
        };
        assert!(Codec::new(config).is_err());
    }

    #[test]
    fn decode_is_shareable_across_threads() {
        let codec = Codec::default();
        let handles: Vec<_> = (0..4u8)
            .map(|battery| {
                std::thread::spawn(move || {
                    codec.decode_uplink(&status_bytes(10, battery, 1), 1)
                })
            })
            .collect();
        for (battery, handle) in handles.into_iter().enumerate() {
            let result = handle.join().expect("thread");
            let Some(MessageVariant::StatusReport(status)) = result.data else {
                panic!("expected status report");
            };
            assert_eq!(usize::from(status.battery_percent), battery);
        }
    }
}
