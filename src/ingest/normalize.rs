//! Header normalization for column matching

/// Canonicalize a spreadsheet header for matching
///
/// Lower-cases, trims, and collapses every whitespace run to a single space.
/// The original header string is kept for display and row indexing.
pub fn normalize(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
