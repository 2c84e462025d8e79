//! Values that flow through one run: input items, intermediate results, and
//! the final `RunResult`.

use url::Url;

use crate::archive::FinishedArchive;
use crate::error::ItemError;

/// One normalized input: an http(s) URL and its position in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    /// 0-based position among the normalized items; outcomes are ordered by it.
    pub index: usize,
    pub url: String,
}

impl SourceItem {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    /// 1-based position, used for synthetic `document_<n>.pdf` names.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

/// A page that was fetched and whose marker element pointed at `asset_url`.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub item: SourceItem,
    pub asset_url: Url,
}

/// Asset bytes plus the name candidate derived before collision handling.
#[derive(Debug)]
pub struct FetchedPayload {
    pub item: SourceItem,
    pub asset_url: Url,
    pub bytes: Vec<u8>,
    pub suggested_name: String,
}

/// What ended up in the archive for a successful item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedEntry {
    /// Final, run-unique archive entry name.
    pub entry_name: String,
    pub asset_url: String,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the archived bytes.
    pub sha256: String,
}

/// Terminal outcome of one item: archived xor failed.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub item: SourceItem,
    pub result: Result<ArchivedEntry, ItemError>,
}

impl ItemOutcome {
    pub fn archived(item: SourceItem, entry: ArchivedEntry) -> Self {
        Self {
            item,
            result: Ok(entry),
        }
    }

    pub fn failed(item: SourceItem, error: ItemError) -> Self {
        Self {
            item,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate of one complete run. Outcomes are in original input order.
#[derive(Debug)]
pub struct RunResult {
    pub outcomes: Vec<ItemOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
    /// True if a cancellation stopped submission before every item started.
    pub cancelled: bool,
    pub archive: FinishedArchive,
}

impl RunResult {
    pub(crate) fn new(outcomes: Vec<ItemOutcome>, cancelled: bool, archive: FinishedArchive) -> Self {
        let success_count = outcomes.iter().filter(|o| o.is_success()).count();
        let failure_count = outcomes.len() - success_count;
        Self {
            outcomes,
            success_count,
            failure_count,
            cancelled,
            archive,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// `(url, reason)` for every failed item, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ItemError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(_) => None,
            Err(e) => Some((o.item.url.as_str(), e)),
        })
    }
}
