//! Node-side construction of uplink payloads.

use super::error::UplinkError;
use super::layout;
use crate::codec::common::text::latin1_bytes;
use crate::message::{EventReport, StatusReport};

fn header(tag: u8, version: u8) -> Result<u8, UplinkError> {
    if version > layout::MAX_VERSION {
        return Err(UplinkError::InvalidVersion {
            version,
            max: layout::MAX_VERSION,
        });
    }
    Ok(layout::join_header(tag, version))
}

pub fn encode_status(status: &StatusReport) -> Result<Vec<u8>, UplinkError> {
    let tagged = layout::latest_tagged_layout();
    let mut payload = Vec::with_capacity(tagged.status_len());
    payload.push(header(layout::TAG_STATUS, status.version)?);
    payload.extend_from_slice(&status.timestamp.to_be_bytes());
    payload.push(status.battery_percent);
    payload.push(status.recording_state.code());
    Ok(payload)
}

pub fn encode_event(report: &EventReport) -> Result<Vec<u8>, UplinkError> {
    let count = u8::try_from(report.events.len()).map_err(|_| UplinkError::TooManyEvents {
        count: report.events.len(),
        max: layout::MAX_EVENTS,
    })?;

    let tagged = layout::latest_tagged_layout();
    let mut payload = Vec::with_capacity(tagged.event_len(report.events.len()));
    payload.push(header(layout::TAG_EVENT, report.version)?);
    payload.extend_from_slice(&report.timestamp.to_be_bytes());
    payload.push(count);
    for event in &report.events {
        let label = latin1_bytes(&event.label)
            .filter(|bytes| bytes.len() == tagged.label_len)
            .ok_or_else(|| UplinkError::InvalidLabel {
                label: event.label.clone(),
                expected: tagged.label_len,
            })?;
        payload.extend_from_slice(&label);
        payload.push(event.confidence);
    }
    Ok(payload)
}

pub fn encode_counter(counter1: u8, counter2: u16) -> Vec<u8> {
    let mut payload = Vec::with_capacity(layout::COUNTER_LEN);
    payload.push(counter1);
    payload.extend_from_slice(&counter2.to_be_bytes());
    payload
}

#[cfg(test)]
mod tests {
    use super::{encode_counter, encode_event, encode_status};
    use crate::codec::uplink::error::UplinkError;
    use crate::codec::uplink::parser::decode_uplink;
    use crate::config::UplinkChannels;
    use crate::message::{
        CounterReport, Event, EventReport, MessageVariant, RecordingState, StatusReport,
    };

    #[test]
    fn status_round_trip() {
        let channels = UplinkChannels::default();
        for code in 0..=5u8 {
            let status = StatusReport {
                version: 0,
                timestamp: 1_700_000_000 + u64::from(code),
                battery_percent: 20 * code,
                recording_state: RecordingState::from_code(code),
            };
            let payload = encode_status(&status).unwrap();
            assert_eq!(payload.len(), 11);
            let decoded = decode_uplink(&payload, channels.tagged, &channels).unwrap();
            assert_eq!(decoded.message, MessageVariant::StatusReport(status));
        }
    }

    #[test]
    fn event_layout() {
        let report = EventReport {
            version: 0,
            timestamp: 1,
            events: vec![Event {
                label: "eleph".to_string(),
                confidence: 80,
            }],
        };
        let payload = encode_event(&report).unwrap();
        assert_eq!(
            payload,
            [0x10, 0, 0, 0, 0, 0, 0, 0, 1, 1, b'e', b'l', b'e', b'p', b'h', 80]
        );
    }

    #[test]
    fn event_rejects_bad_label() {
        let report = EventReport {
            version: 0,
            timestamp: 1,
            events: vec![Event {
                label: "ele".to_string(),
                confidence: 80,
            }],
        };
        let err = encode_event(&report).unwrap_err();
        assert!(matches!(err, UplinkError::InvalidLabel { expected: 5, .. }));
    }

    #[test]
    fn event_rejects_too_many_events() {
        let event = Event {
            label: "noise".to_string(),
            confidence: 1,
        };
        let report = EventReport {
            version: 0,
            timestamp: 1,
            events: vec![event; 256],
        };
        let err = encode_event(&report).unwrap_err();
        assert_eq!(err, UplinkError::TooManyEvents { count: 256, max: 255 });
    }

    #[test]
    fn status_rejects_wide_version() {
        let status = StatusReport {
            version: 16,
            timestamp: 0,
            battery_percent: 0,
            recording_state: RecordingState::Invalid,
        };
        assert!(matches!(
            encode_status(&status),
            Err(UplinkError::InvalidVersion { version: 16, .. })
        ));
    }

    #[test]
    fn counter_round_trip() {
        let channels = UplinkChannels::default();
        let payload = encode_counter(99, 1999);
        assert_eq!(payload, [99, 0x07, 0xCF]);
        let decoded = decode_uplink(&payload, channels.counter, &channels).unwrap();
        assert_eq!(
            decoded.message,
            MessageVariant::CounterReport(CounterReport {
                counter1: 99,
                counter2: 1999
            })
        );
    }
}
