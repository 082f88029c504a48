use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DownlinkError;
use super::layout::COLOR_NAMES;

/// Color selectable by a downlink, in wire-index order.
///
/// # Examples
/// ```
/// use eloc_lora_core::Color;
///
/// let color: Color = "green".parse().unwrap();
/// assert_eq!(color.index(), 1);
/// assert_eq!(Color::from_index(2), Some(Color::Blue));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
}

const COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

impl Color {
    pub fn index(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        COLORS.get(usize::from(index)).copied()
    }

    pub fn name(self) -> &'static str {
        COLOR_NAMES[usize::from(self.index())]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = DownlinkError;

    /// Names match exactly; `"Green"` is not `"green"`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        COLOR_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| COLORS[index])
            .ok_or_else(|| DownlinkError::UnknownColor {
                name: name.to_string(),
            })
    }
}

/// Command as submitted by an application: a color name and a counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlinkCommand {
    pub color: String,
    pub counter: u16,
}

impl DownlinkCommand {
    pub fn new(color: impl Into<String>, counter: u16) -> Self {
        Self {
            color: color.into(),
            counter,
        }
    }
}
