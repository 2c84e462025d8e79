//! DocHarvest core: turn a batch of page links into one zip of the documents
//! those pages embed.
//!
//! Pipeline per item: `input` → `resolver` → `fetcher` → `url_model` →
//! `archive`, driven and summarized by `pipeline::run_batch`.

pub mod config;
pub mod logging;

pub mod archive;
pub mod checksum;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod url_model;

pub use error::{FailureKind, ItemError, RunError};
pub use model::{ArchivedEntry, ItemOutcome, RunResult, SourceItem};
pub use pipeline::{run_batch, RunControl, RunOptions, RunProgress};
