//! Channel routing configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::downlink::layout::DOWNLINK_CHANNEL;
use crate::codec::uplink::layout::{DEFAULT_COUNTER_CHANNEL, DEFAULT_TAGGED_CHANNEL};

/// FPort 0 carries MAC commands only.
const RESERVED_CHANNEL: u8 = 0;

/// Uplink channel assignment for the two dialects.
///
/// # Examples
/// ```
/// use eloc_lora_core::UplinkChannels;
///
/// let channels = UplinkChannels::default();
/// assert_eq!((channels.tagged, channels.counter), (1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UplinkChannels {
    /// Channel carrying tagged status/event messages.
    pub tagged: u8,
    /// Channel carrying the legacy counter payload.
    pub counter: u8,
}

impl Default for UplinkChannels {
    fn default() -> Self {
        Self {
            tagged: DEFAULT_TAGGED_CHANNEL,
            counter: DEFAULT_COUNTER_CHANNEL,
        }
    }
}

/// Codec configuration, typically loaded from JSON.
///
/// Missing fields take their defaults:
///
/// ```
/// use eloc_lora_core::CodecConfig;
///
/// let config: CodecConfig = serde_json::from_str(r#"{"channels": {"tagged": 10}}"#).unwrap();
/// assert_eq!(config.channels.tagged, 10);
/// assert_eq!(config.channels.counter, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub channels: UplinkChannels,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("channel {channel} is reserved for MAC commands")]
    ReservedChannel { channel: u8 },
    #[error("tagged and counter dialects share channel {channel}")]
    SharedChannel { channel: u8 },
    #[error("uplink channel {channel} collides with the downlink channel")]
    DownlinkCollision { channel: u8 },
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let UplinkChannels { tagged, counter } = self.channels;
        for channel in [tagged, counter] {
            if channel == RESERVED_CHANNEL {
                return Err(ConfigError::ReservedChannel { channel });
            }
            if channel == DOWNLINK_CHANNEL {
                return Err(ConfigError::DownlinkCollision { channel });
            }
        }
        if tagged == counter {
            return Err(ConfigError::SharedChannel { channel: tagged });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_shared_channel() {
        let config = CodecConfig {
            channels: UplinkChannels {
                tagged: 3,
                counter: 3,
            },
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SharedChannel { channel: 3 })
        );
    }

    #[test]
    fn rejects_reserved_and_downlink_channels() {
        let reserved = CodecConfig {
            channels: UplinkChannels {
                tagged: 0,
                counter: 2,
            },
        };
        assert!(matches!(
            reserved.validate(),
            Err(ConfigError::ReservedChannel { channel: 0 })
        ));

        let downlink = CodecConfig {
            channels: UplinkChannels {
                tagged: 1,
                counter: 4,
            },
        };
        assert!(matches!(
            downlink.validate(),
            Err(ConfigError::DownlinkCollision { channel: 4 })
        ));
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config: CodecConfig = serde_json::from_str("{}").expect("config json");
        assert_eq!(config, CodecConfig::default());
    }
}
