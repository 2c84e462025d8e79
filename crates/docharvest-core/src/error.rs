//! Item-scoped and run-fatal error types.
//!
//! Every `ItemError` is recovered by the pipeline and recorded as that item's
//! failure outcome. Only `RunError` escapes `run_batch`.

use serde::Serialize;
use thiserror::Error;

use crate::archive::ArchiveError;

/// Why a single input item failed. The `Display` text is the recorded reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Network, timeout, or HTTP-status failure reaching the page.
    #[error("{0}")]
    PageFetch(String),
    /// Page fetched but no marker element (or no `src` on it).
    #[error("embedded resource not found")]
    AssetNotFound,
    /// Network, timeout, or HTTP-status failure reaching the resolved asset.
    #[error("{0}")]
    AssetFetch(String),
    /// Never started because the run was cancelled first.
    #[error("run cancelled before this item started")]
    Cancelled,
}

/// Copyable tag for an `ItemError`, used in reports and tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PageFetchError,
    AssetNotFound,
    AssetFetchError,
    Cancelled,
}

impl ItemError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ItemError::PageFetch(_) => FailureKind::PageFetchError,
            ItemError::AssetNotFound => FailureKind::AssetNotFound,
            ItemError::AssetFetch(_) => FailureKind::AssetFetchError,
            ItemError::Cancelled => FailureKind::Cancelled,
        }
    }
}

/// Conditions that abort the whole run rather than a single item.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("archive: {0}")]
    Archive(#[from] ArchiveError),
    #[error("worker task failed: {0}")]
    Worker(String),
}
