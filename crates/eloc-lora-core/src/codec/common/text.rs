/// Decode bytes as Latin-1: each byte becomes the `char` with the same code point.
pub fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode a Latin-1 string back to bytes.
///
/// Returns `None` when a character lies outside `U+0000..=U+00FF`.
pub(crate) fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(c).ok()).collect()
}

/// Unit for a byte count in messages.
pub(crate) fn byte_unit(count: &usize) -> &'static str {
    if *count == 1 { "byte" } else { "bytes" }
}
