use std::fmt;

use tracing::{debug, warn};

use super::error::UplinkError;
use super::layout::{self, TaggedLayout};
use super::reader::UplinkReader;
use crate::config::UplinkChannels;
use crate::message::{
    CounterReport, Event, EventReport, MessageVariant, RawMessage, RecordingState, StatusReport,
};

/// Successfully decoded uplink with any recoverable anomalies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub message: MessageVariant,
    pub warnings: Vec<UplinkWarning>,
}

/// Recoverable anomaly noticed while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UplinkWarning {
    /// Header carried a version with no layout; the newest layout was used.
    UnsupportedVersion { version: u8, decoded_with: u8 },
    /// Payload continued past the layout's last field.
    TrailingBytes { count: usize },
}

impl fmt::Display for UplinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UplinkWarning::UnsupportedVersion {
                version,
                decoded_with,
            } => write!(
                f,
                "unsupported message version {version}, decoded with version {decoded_with} layout"
            ),
            UplinkWarning::TrailingBytes { count } => write!(f, "{count} trailing bytes ignored"),
        }
    }
}

/// Dialect an uplink channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Tagged,
    Counter,
}

fn dialect_for(channel: u8, channels: &UplinkChannels) -> Option<Dialect> {
    if channel == channels.tagged {
        Some(Dialect::Tagged)
    } else if channel == channels.counter {
        Some(Dialect::Counter)
    } else {
        None
    }
}

/// Decode one uplink payload received on `channel`.
pub fn decode_uplink(
    payload: &[u8],
    channel: u8,
    channels: &UplinkChannels,
) -> Result<Decoded, UplinkError> {
    let Some(dialect) = dialect_for(channel, channels) else {
        debug!(channel, "uplink on unknown channel");
        return Err(UplinkError::UnknownChannel { channel });
    };

    let reader = UplinkReader::new(payload);
    let result = match dialect {
        Dialect::Tagged => decode_tagged(&reader, channel),
        Dialect::Counter => decode_counter(&reader),
    };
    if let Err(err) = &result {
        warn!(channel, len = payload.len(), %err, "uplink rejected");
    }
    result
}

fn decode_tagged(reader: &UplinkReader<'_>, channel: u8) -> Result<Decoded, UplinkError> {
    reader.require_len(layout::HEADER_LEN)?;
    let (tag, version) = reader.read_header()?;
    debug!(channel, tag, version, "tagged uplink");

    let mut warnings = Vec::new();
    let (message, consumed) = match tag {
        layout::TAG_STATUS => {
            let tagged = resolve_layout(version, &mut warnings);
            let (status, consumed) = parse_status(reader, tagged, version)?;
            (MessageVariant::StatusReport(status), consumed)
        }
        layout::TAG_EVENT => {
            let tagged = resolve_layout(version, &mut warnings);
            let (events, consumed) = parse_events(reader, tagged, version)?;
            (MessageVariant::EventReport(events), consumed)
        }
        _ => {
            debug!(tag, "unknown uplink tag, passing through");
            let message = MessageVariant::UnknownMessage {
                tag,
                version,
                raw: RawMessage::new(reader.bytes(), channel),
            };
            (message, reader.len())
        }
    };

    push_trailing(&mut warnings, reader.len(), consumed);
    Ok(Decoded { message, warnings })
}

/// Layout for `version`, falling back to the newest one with a warning.
fn resolve_layout(version: u8, warnings: &mut Vec<UplinkWarning>) -> &'static TaggedLayout {
    if let Some(tagged) = layout::tagged_layout(version) {
        return tagged;
    }
    let fallback = layout::latest_tagged_layout();
    warn!(version, fallback = fallback.version, "unsupported uplink version");
    warnings.push(UplinkWarning::UnsupportedVersion {
        version,
        decoded_with: fallback.version,
    });
    fallback
}

fn parse_status(
    reader: &UplinkReader<'_>,
    tagged: &TaggedLayout,
    version: u8,
) -> Result<(StatusReport, usize), UplinkError> {
    let needed = tagged.status_len();
    reader.require_len(needed)?;

    let timestamp = reader.read_u64_be(tagged.timestamp.clone())?;
    let battery_percent = reader.read_u8(tagged.battery_offset)?;
    let recording_state = RecordingState::from_code(reader.read_u8(tagged.state_offset)?);

    Ok((
        StatusReport {
            version,
            timestamp,
            battery_percent,
            recording_state,
        },
        needed,
    ))
}

fn parse_events(
    reader: &UplinkReader<'_>,
    tagged: &TaggedLayout,
    version: u8,
) -> Result<(EventReport, usize), UplinkError> {
    reader.require_len(tagged.event_len(0))?;

    let timestamp = reader.read_u64_be(tagged.timestamp.clone())?;
    let count = usize::from(reader.read_u8(tagged.event_count_offset)?);
    let needed = tagged.event_len(count);
    reader.require_len(needed)?;

    let events = (0..count)
        .map(|index| {
            Ok(Event {
                label: reader.read_latin1(tagged.event_label_range(index))?,
                confidence: reader.read_u8(tagged.event_confidence_offset(index))?,
            })
        })
        .collect::<Result<Vec<_>, UplinkError>>()?;

    Ok((
        EventReport {
            version,
            timestamp,
            events,
        },
        needed,
    ))
}

fn decode_counter(reader: &UplinkReader<'_>) -> Result<Decoded, UplinkError> {
    reader.require_len(layout::COUNTER_LEN)?;
    let counter1 = reader.read_u8(layout::COUNTER1_OFFSET)?;
    let counter2 = reader.read_u16_be(layout::COUNTER2_RANGE)?;

    let mut warnings = Vec::new();
    push_trailing(&mut warnings, reader.len(), layout::COUNTER_LEN);
    Ok(Decoded {
        message: MessageVariant::CounterReport(CounterReport { counter1, counter2 }),
        warnings,
    })
}

fn push_trailing(warnings: &mut Vec<UplinkWarning>, len: usize, consumed: usize) {
    if len > consumed {
        warnings.push(UplinkWarning::TrailingBytes {
            count: len - consumed,
        });
    }
}
