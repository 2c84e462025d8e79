//! Archive-entry-safe filename sanitization.

/// Longest entry name kept, in bytes.
pub(super) const NAME_MAX: usize = 255;

/// Longest suffix treated as an extension when a name is shortened.
const EXT_MAX: usize = 16;

/// Sanitizes a candidate archive entry name.
///
/// - Replaces `/`, `\`, control characters, whitespace, and `: * ? " < > |` with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes on a char boundary, keeping the extension
pub fn sanitize_entry_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = c.is_control()
            || c.is_whitespace()
            || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
        let replacement = if unsafe_char { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }
    match split_extension(trimmed) {
        (stem, ext) if ext.len() <= EXT_MAX => fit_name(stem, ext),
        _ => fit_name(trimmed, ""),
    }
}

/// `stem` cut on a char boundary so that `stem + tail` fits in `NAME_MAX`
/// bytes, followed by `tail`.
pub(super) fn fit_name(stem: &str, tail: &str) -> String {
    let mut take = NAME_MAX.saturating_sub(tail.len()).min(stem.len());
    while take > 0 && !stem.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{}", &stem[..take], tail)
}

/// `("doc", ".pdf")` for `"doc.pdf"`; a leading dot is not an extension.
pub(super) fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}
