//! Decoded message model shared by the uplink parser and encoder.

use serde::{Deserialize, Serialize};

/// Raw payload as received from the network server.
///
/// # Examples
/// ```
/// use eloc_lora_core::RawMessage;
///
/// let raw = RawMessage::new(&[0x20, 0x01], 1);
/// assert_eq!(raw.bytes, vec![0x20, 0x01]);
/// assert_eq!(raw.channel, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Payload bytes in wire order.
    pub bytes: Vec<u8>,
    /// Logical port (LoRaWAN FPort) the payload arrived on.
    pub channel: u8,
}

impl RawMessage {
    pub fn new(bytes: &[u8], channel: u8) -> Self {
        Self {
            bytes: bytes.to_vec(),
            channel,
        }
    }
}

/// One decoded uplink message.
///
/// Serialized with a `type` discriminator, e.g. `{"type": "status_report", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageVariant {
    /// Periodic node status (tag 0).
    StatusReport(StatusReport),
    /// Classifier detections since the last report (tag 1).
    EventReport(EventReport),
    /// Legacy counter payload on the simple channel.
    CounterReport(CounterReport),
    /// Tagged payload whose tag is not known to this codec.
    UnknownMessage {
        tag: u8,
        version: u8,
        raw: RawMessage,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Format version taken from the header nibble.
    pub version: u8,
    /// Node clock in Unix seconds.
    pub timestamp: u64,
    /// Battery state of charge; the node sends 0..=100 but this is not checked.
    pub battery_percent: u8,
    pub recording_state: RecordingState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReport {
    pub version: u8,
    pub timestamp: u64,
    /// Events in wire order.
    pub events: Vec<Event>,
}

/// A single classifier detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Fixed-width label, one `char` per wire byte (Latin-1).
    pub label: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReport {
    pub counter1: u8,
    pub counter2: u16,
}

/// Recording/detection mode reported by the node.
///
/// # Examples
/// ```
/// use eloc_lora_core::RecordingState;
///
/// assert_eq!(RecordingState::from_code(3), RecordingState::RecordOnDetectOn);
/// assert_eq!(RecordingState::from_code(42), RecordingState::Invalid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordingState {
    #[serde(rename = "recInvalid")]
    Invalid,
    #[serde(rename = "recordOff_detectOff")]
    RecordOffDetectOff,
    #[serde(rename = "recordOn_detectOff")]
    RecordOnDetectOff,
    #[serde(rename = "recordOn_detectOn")]
    RecordOnDetectOn,
    #[serde(rename = "recordOff_detectOn")]
    RecordOffDetectOn,
    #[serde(rename = "recordOnEvent")]
    RecordOnEvent,
}

/// Wire code -> state, indexed by code.
const RECORDING_STATES: [RecordingState; 6] = [
    RecordingState::Invalid,
    RecordingState::RecordOffDetectOff,
    RecordingState::RecordOnDetectOff,
    RecordingState::RecordOnDetectOn,
    RecordingState::RecordOffDetectOn,
    RecordingState::RecordOnEvent,
];

impl RecordingState {
    /// Map a wire code; codes outside the table resolve to `Invalid`.
    pub fn from_code(code: u8) -> Self {
        RECORDING_STATES
            .get(usize::from(code))
            .copied()
            .unwrap_or(RecordingState::Invalid)
    }

    /// Wire code of this state.
    pub fn code(self) -> u8 {
        match self {
            RecordingState::Invalid => 0,
            RecordingState::RecordOffDetectOff => 1,
            RecordingState::RecordOnDetectOff => 2,
            RecordingState::RecordOnDetectOn => 3,
            RecordingState::RecordOffDetectOn => 4,
            RecordingState::RecordOnEvent => 5,
        }
    }
}
