//! Presentation helpers for glue code. Nothing in the codec depends on these.

use time::OffsetDateTime;
use time::format_description;

/// Render raw label bytes as text, one `char` per byte.
///
/// # Examples
/// ```
/// use eloc_lora_core::format::latin1_string;
///
/// assert_eq!(latin1_string(&[0x67, 0x75, 0x6E, 0xE9, 0x00]), "gun\u{e9}\0");
/// ```
pub use crate::codec::common::text::latin1_string;

const DISPLAY_FORMAT: &str = "[day padding:none] [month repr:short] [year] \
     [hour padding:none]:[minute padding:none]:[second padding:none]";

/// Render Unix seconds as `"<day> <Mon> <year> <H>:<M>:<S>"` in UTC.
///
/// Returns `None` when the timestamp is outside the supported calendar range.
///
/// # Examples
/// ```
/// use eloc_lora_core::format::format_unix_timestamp;
///
/// assert_eq!(
///     format_unix_timestamp(1_700_000_000).as_deref(),
///     Some("14 Nov 2023 22:13:20")
/// );
/// assert_eq!(format_unix_timestamp(u64::MAX), None);
/// ```
pub fn format_unix_timestamp(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    let dt = OffsetDateTime::from_unix_timestamp(secs).ok()?;
    let description = format_description::parse(DISPLAY_FORMAT).ok()?;
    dt.format(&description).ok()
}
