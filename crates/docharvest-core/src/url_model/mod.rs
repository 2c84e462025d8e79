//! Archive entry naming.
//!
//! Derives a safe `.pdf` name for each fetched asset from the asset URL
//! path, and keeps names unique across a run through `NameRegistry`.

mod path;
mod registry;
mod sanitize;

pub use path::filename_from_url_path;
pub use registry::NameRegistry;
pub use sanitize::sanitize_entry_name;

const PDF_EXTENSION: &str = ".pdf";

/// `document_<position>.pdf`, used when nothing better is available.
pub fn synthetic_name(position: usize) -> String {
    format!("document_{position}{PDF_EXTENSION}")
}

/// True if `name` ends in `.pdf` (ASCII case-insensitive) and has a stem.
pub fn has_pdf_extension(name: &str) -> bool {
    name.len() > PDF_EXTENSION.len()
        && name.is_char_boundary(name.len() - PDF_EXTENSION.len())
        && name[name.len() - PDF_EXTENSION.len()..].eq_ignore_ascii_case(PDF_EXTENSION)
}

/// Derives the candidate entry name before collision handling.
///
/// Uses the last path segment of `asset_url` (query and fragment stripped)
/// when it is a `.pdf` name after sanitization, and otherwise falls back to
/// `document_<position>.pdf`. The result depends only on its arguments.
///
/// # Examples
///
/// - `derive_candidate_name("https://site/docs/1.pdf", 1)` → `"1.pdf"`
/// - `derive_candidate_name("https://site/view?id=7", 3)` → `"document_3.pdf"`
pub fn derive_candidate_name(asset_url: &str, position: usize) -> String {
    filename_from_url_path(asset_url)
        .map(|n| sanitize_entry_name(&n))
        .filter(|n| has_pdf_extension(n))
        .unwrap_or_else(|| synthetic_name(position))
}
