pub const DOWNLINK_CHANNEL: u8 = 4;

pub const COLOR_OFFSET: usize = 0;
pub const COUNTER_LOW_OFFSET: usize = 1;
pub const COUNTER_HIGH_OFFSET: usize = 2;
pub const PAYLOAD_LEN: usize = 3;

/// Color names in wire-index order.
pub const COLOR_NAMES: [&str; 3] = ["red", "green", "blue"];
