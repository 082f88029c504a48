use std::ops::Range;

pub const DEFAULT_TAGGED_CHANNEL: u8 = 1;
pub const DEFAULT_COUNTER_CHANNEL: u8 = 2;

pub const HEADER_OFFSET: usize = 0;
pub const HEADER_LEN: usize = 1;
pub const TAG_SHIFT: u32 = 4;
pub const VERSION_MASK: u8 = 0x0F;
pub const MAX_VERSION: u8 = VERSION_MASK;

pub const TAG_STATUS: u8 = 0;
pub const TAG_EVENT: u8 = 1;

pub const LABEL_LEN: usize = 5;
pub const MAX_EVENTS: usize = u8::MAX as usize;

pub const COUNTER1_OFFSET: usize = 0;
pub const COUNTER2_RANGE: Range<usize> = 1..3;
pub const COUNTER_LEN: usize = 3;

/// Field positions of the tagged dialect for one format version.
#[derive(Debug)]
pub struct TaggedLayout {
    pub version: u8,
    pub timestamp: Range<usize>,
    pub battery_offset: usize,
    pub state_offset: usize,
    pub event_count_offset: usize,
    pub events_offset: usize,
    pub label_len: usize,
}

impl TaggedLayout {
    pub fn status_len(&self) -> usize {
        self.state_offset + 1
    }

    /// Label plus confidence byte.
    pub fn event_size(&self) -> usize {
        self.label_len + 1
    }

    pub fn event_label_range(&self, index: usize) -> Range<usize> {
        let start = self.events_offset + index * self.event_size();
        start..start + self.label_len
    }

    pub fn event_confidence_offset(&self, index: usize) -> usize {
        self.event_label_range(index).end
    }

    /// Required length for `count` events.
    pub fn event_len(&self, count: usize) -> usize {
        self.events_offset + count * self.event_size()
    }
}

/// Known layouts, oldest first.
pub static TAGGED_LAYOUTS: [TaggedLayout; 1] = [TaggedLayout {
    version: 0,
    timestamp: 1..9,
    battery_offset: 9,
    state_offset: 10,
    event_count_offset: 9,
    events_offset: 10,
    label_len: LABEL_LEN,
}];

pub fn tagged_layout(version: u8) -> Option<&'static TaggedLayout> {
    TAGGED_LAYOUTS.iter().find(|layout| layout.version == version)
}

pub fn latest_tagged_layout() -> &'static TaggedLayout {
    &TAGGED_LAYOUTS[TAGGED_LAYOUTS.len() - 1]
}

pub fn split_header(header: u8) -> (u8, u8) {
    (header >> TAG_SHIFT, header & VERSION_MASK)
}

pub fn join_header(tag: u8, version: u8) -> u8 {
    (tag << TAG_SHIFT) | (version & VERSION_MASK)
}
