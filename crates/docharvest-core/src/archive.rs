//! In-memory zip archive assembly.
//!
//! Entries are append-only and never overwritten; `NameRegistry` makes every
//! entry name unique before it is written. The archive bytes only become
//! visible through `finish`, after the central directory has been written.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::url_model::NameRegistry;

pub const ZIP_MIME_TYPE: &str = "application/zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("write entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Accumulates `(name, bytes)` entries into a deflate-compressed zip.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: NameRegistry,
    entry_names: Vec<String>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: NameRegistry::new(),
            entry_names: Vec::new(),
        }
    }

    /// Assigns a unique name derived from `candidate`, writes `bytes` under
    /// it, and returns the final name.
    pub fn append(&mut self, candidate: &str, bytes: &[u8]) -> Result<String, ArchiveError> {
        let name = self.names.claim(candidate);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(name.as_str(), options)?;
        self.writer.write_all(bytes)?;
        self.entry_names.push(name.clone());
        Ok(name)
    }

    pub fn entry_count(&self) -> usize {
        self.entry_names.len()
    }

    /// Writes the central directory and hands out the complete archive.
    pub fn finish(mut self, suggested_filename: impl Into<String>) -> Result<FinishedArchive, ArchiveError> {
        let cursor = self.writer.finish()?;
        Ok(FinishedArchive {
            bytes: cursor.into_inner(),
            entry_names: self.entry_names,
            suggested_filename: suggested_filename.into(),
        })
    }
}

/// A closed zip archive, ready to be saved or served.
#[derive(Debug, Clone)]
pub struct FinishedArchive {
    pub bytes: Vec<u8>,
    /// Entry names in the order they were written.
    pub entry_names: Vec<String>,
    /// Conventional download name, e.g. `downloads.zip`.
    pub suggested_filename: String,
}

impl FinishedArchive {
    pub fn mime_type(&self) -> &'static str {
        ZIP_MIME_TYPE
    }

    pub fn entry_count(&self) -> usize {
        self.entry_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_names.is_empty()
    }
}
