//! Last path segment of an asset URL.

/// Returns the last non-empty path segment of `url`, percent-decoded, without
/// query or fragment. Strings that do not parse as URLs are split by hand.
///
/// Returns `None` for root paths and `.`/`..` segments.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => {
            let without_fragment = url.split('#').next().unwrap_or("");
            let without_query = without_fragment.split('?').next().unwrap_or("");
            without_query
                .rsplit('/')
                .find(|s| !s.is_empty())
                .map(str::to_string)
        }
    }?;
    let segment = percent_decode(&segment);
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

/// Percent-decodes `input`; malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
