use serde::{Deserialize, Serialize};
use tracing::debug;

use super::command::{Color, DownlinkCommand};
use super::error::DownlinkError;
use super::layout;

/// Payload ready to be queued on the network server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDownlink {
    pub bytes: Vec<u8>,
    pub channel: u8,
}

pub fn encode_downlink(command: &DownlinkCommand) -> Result<EncodedDownlink, DownlinkError> {
    let color: Color = command.color.parse()?;
    let [low, high] = command.counter.to_le_bytes();

    let mut bytes = vec![0u8; layout::PAYLOAD_LEN];
    bytes[layout::COLOR_OFFSET] = color.index();
    bytes[layout::COUNTER_LOW_OFFSET] = low;
    bytes[layout::COUNTER_HIGH_OFFSET] = high;
    debug!(%color, counter = command.counter, "downlink encoded");

    Ok(EncodedDownlink {
        bytes,
        channel: layout::DOWNLINK_CHANNEL,
    })
}

#[cfg(test)]
mod tests {
    use super::encode_downlink;
    use crate::codec::downlink::command::DownlinkCommand;
    use crate::codec::downlink::error::DownlinkError;

    #[test]
    fn encode_green_300() {
        let encoded = encode_downlink(&DownlinkCommand::new("green", 300)).unwrap();
        assert_eq!(encoded.bytes, [1, 44, 1]);
        assert_eq!(encoded.channel, 4);
    }

    #[test]
    fn encode_counter_is_little_endian() {
        let encoded = encode_downlink(&DownlinkCommand::new("blue", 0xABCD)).unwrap();
        assert_eq!(encoded.bytes, [2, 0xCD, 0xAB]);
        let encoded = encode_downlink(&DownlinkCommand::new("red", 0)).unwrap();
        assert_eq!(encoded.bytes, [0, 0, 0]);
    }

    #[test]
    fn encode_unknown_color() {
        let err = encode_downlink(&DownlinkCommand::new("purple", 1)).unwrap_err();
        assert_eq!(
            err,
            DownlinkError::UnknownColor {
                name: "purple".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown color: purple");
    }
}
