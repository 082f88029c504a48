use serde::{Deserialize, Serialize};
use tracing::debug;

use super::command::Color;
use super::error::DownlinkError;
use super::layout;

/// What can be recovered from a downlink payload. The counter is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlinkData {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedDownlink {
    pub data: DownlinkData,
    /// Set when the payload length differs from the three bytes the node expects.
    pub unexpected_len: Option<usize>,
}

pub fn decode_downlink(payload: &[u8], channel: u8) -> Result<DecodedDownlink, DownlinkError> {
    if channel != layout::DOWNLINK_CHANNEL {
        debug!(channel, "downlink on unknown FPort");
        return Err(DownlinkError::UnknownFPort { channel });
    }

    let index = payload
        .get(layout::COLOR_OFFSET)
        .copied()
        .ok_or(DownlinkError::MalformedBuffer {
            needed: layout::COLOR_OFFSET + 1,
            actual: payload.len(),
        })?;
    let color = Color::from_index(index).ok_or(DownlinkError::UnknownColorIndex { index })?;
    let unexpected_len = (payload.len() != layout::PAYLOAD_LEN).then_some(payload.len());

    Ok(DecodedDownlink {
        data: DownlinkData { color },
        unexpected_len,
    })
}

#[cfg(test)]
mod tests {
    use super::decode_downlink;
    use crate::codec::downlink::command::{Color, DownlinkCommand};
    use crate::codec::downlink::encoder::encode_downlink;
    use crate::codec::downlink::error::DownlinkError;

    #[test]
    fn decode_green() {
        let decoded = decode_downlink(&[1, 44, 1], 4).unwrap();
        assert_eq!(decoded.data.color, Color::Green);
        assert_eq!(decoded.unexpected_len, None);
    }

    #[test]
    fn decode_recovers_encoded_color() {
        for name in ["red", "green", "blue"] {
            let encoded = encode_downlink(&DownlinkCommand::new(name, 7)).unwrap();
            let decoded = decode_downlink(&encoded.bytes, encoded.channel).unwrap();
            assert_eq!(decoded.data.color.name(), name);
        }
    }

    #[test]
    fn decode_unknown_fport() {
        let err = decode_downlink(&[1, 44, 1], 1).unwrap_err();
        assert_eq!(err.to_string(), "unknown FPort");
    }

    #[test]
    fn decode_color_index_out_of_range() {
        let err = decode_downlink(&[3, 0, 0], 4).unwrap_err();
        assert_eq!(err, DownlinkError::UnknownColorIndex { index: 3 });
    }

    #[test]
    fn decode_empty_payload() {
        let err = decode_downlink(&[], 4).unwrap_err();
        assert!(matches!(err, DownlinkError::MalformedBuffer { needed: 1, actual: 0 }));
        assert_eq!(err.to_string(), "malformed buffer: need 1 byte, got 0");
    }

    #[test]
    fn decode_flags_unexpected_length() {
        let decoded = decode_downlink(&[0], 4).unwrap();
        assert_eq!(decoded.data.color, Color::Red);
        assert_eq!(decoded.unexpected_len, Some(1));
    }
}
