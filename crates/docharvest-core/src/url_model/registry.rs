//! Run-wide set of assigned archive entry names.

use std::collections::HashSet;

use super::sanitize::{fit_name, split_extension};

/// Names handed out so far in one archive. Comparison is ASCII
/// case-insensitive so the archive also extracts cleanly on
/// case-insensitive filesystems.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `candidate`, or the first free `stem_N.ext` (N = 2, 3, ...)
    /// if it is taken. Returns the reserved name. Suffixed names are kept
    /// within the entry name length limit by shortening the stem.
    pub fn claim(&mut self, candidate: &str) -> String {
        if self.taken.insert(candidate.to_ascii_lowercase()) {
            return candidate.to_string();
        }
        let (stem, ext) = split_extension(candidate);
        let mut n: u64 = 2;
        loop {
            let name = fit_name(stem, &format!("_{n}{ext}"));
            if self.taken.insert(name.to_ascii_lowercase()) {
                return name;
            }
            n += 1;
        }
    }
}
