//! Input normalization: raw cell values or pasted lines into ordered
//! `SourceItem`s.
//!
//! Only the scheme is checked. Anything starting with `http://` or `https://`
//! passes through and fails later at fetch time if it is malformed.

mod table;

pub use table::{extract_raw_inputs, RawInputs, Table, TableError};

use crate::model::SourceItem;

/// Separators that may join several links inside one raw string.
const SEPARATORS: &[char] = &['\t', ',', '\n', '\r'];

/// Splits one raw string on tabs, commas, and newlines; trims each piece and
/// drops empty ones.
pub fn split_candidates(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// True if `s` starts with `http://` or `https://` (scheme compared
/// case-insensitively).
pub fn is_http_url(s: &str) -> bool {
    has_prefix_ignore_case(s, "http://") || has_prefix_ignore_case(s, "https://")
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Turns raw strings into ordered `SourceItem`s.
///
/// Order is preserved and duplicates are kept: each occurrence gets its own
/// item and its own outcome. An empty result is valid.
pub fn normalize_inputs<I, S>(raw: I) -> Vec<SourceItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items = Vec::new();
    for value in raw {
        for candidate in split_candidates(value.as_ref()) {
            if is_http_url(candidate) {
                items.push(SourceItem::new(items.len(), candidate));
            } else {
                tracing::debug!(input = candidate, "dropping non-http input");
            }
        }
    }
    items
}
