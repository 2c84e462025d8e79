//! Run aggregation over a bounded worker pool.
//!
//! Keeps up to `max_concurrent` items in flight; when one terminates, the
//! next input item is started until the input is exhausted or the run is
//! cancelled. Outcomes are stored by input slot so `RunResult` is in input
//! order regardless of completion order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::archive::ArchiveBuilder;
use crate::config::HarvestConfig;
use crate::error::{ItemError, RunError};
use crate::http::Transport;
use crate::model::{ItemOutcome, RunResult, SourceItem};
use crate::resolver::AssetLocator;

use super::control::RunControl;
use super::item::{process_item, ItemContext};
use super::progress::RunProgress;

/// Per-run knobs, usually taken from `HarvestConfig`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Worker pool size; values below 1 are treated as 1.
    pub max_concurrent: usize,
    pub page_timeout: Duration,
    pub asset_timeout: Duration,
    /// Suggested filename for the finished archive.
    pub archive_name: String,
}

impl RunOptions {
    pub fn from_config(cfg: &HarvestConfig) -> Self {
        Self {
            max_concurrent: cfg.max_concurrent_items,
            page_timeout: Duration::from_secs(cfg.page_timeout_secs),
            asset_timeout: Duration::from_secs(cfg.asset_timeout_secs),
            archive_name: cfg.archive_name.clone(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&HarvestConfig::default())
    }
}

/// Running tallies plus the progress channel.
struct Tally {
    total: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
    progress_tx: Option<mpsc::Sender<RunProgress>>,
}

impl Tally {
    async fn record(&mut self, outcome: &ItemOutcome) {
        self.completed += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        if let Some(tx) = &self.progress_tx {
            let snapshot = RunProgress {
                completed: self.completed,
                total: self.total,
                current_url: outcome.item.url.clone(),
                succeeded: self.succeeded,
                failed: self.failed,
            };
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(snapshot).await;
        }
    }
}

/// Runs every item through the pipeline and assembles the archive.
///
/// Item failures never abort the run: every item gets exactly one outcome,
/// and a run where everything failed still returns `Ok` with an empty
/// archive. `Err` is reserved for run-fatal conditions (archive write
/// failure, a panicked worker).
///
/// If `control` is `Some` and abort is requested, items not yet started are
/// recorded as `ItemError::Cancelled` and in-flight items finish normally.
pub async fn run_batch(
    items: Vec<SourceItem>,
    transport: Arc<dyn Transport>,
    locator: Arc<dyn AssetLocator>,
    options: &RunOptions,
    progress_tx: Option<mpsc::Sender<RunProgress>>,
    control: Option<RunControl>,
) -> Result<RunResult, RunError> {
    let total = items.len();
    let max_concurrent = options.max_concurrent.max(1);
    tracing::info!(total, max_concurrent, "run started");

    let archive = Arc::new(Mutex::new(ArchiveBuilder::new()));
    let ctx = Arc::new(ItemContext {
        transport,
        locator,
        archive: Arc::clone(&archive),
        page_timeout: options.page_timeout,
        asset_timeout: options.asset_timeout,
    });

    let mut slots: Vec<Option<ItemOutcome>> = (0..total).map(|_| None).collect();
    let mut pending = items.into_iter().enumerate().peekable();
    let mut tally = Tally {
        total,
        completed: 0,
        succeeded: 0,
        failed: 0,
        progress_tx,
    };
    let mut cancelled = false;
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < max_concurrent && !cancelled {
            // An abort only cancels the run if something is left to start.
            if pending.peek().is_none() {
                break;
            }
            if control.as_ref().is_some_and(RunControl::is_aborted) {
                tracing::info!("cancellation requested; no new items will start");
                cancelled = true;
                break;
            }
            let Some((slot, item)) = pending.next() else {
                break;
            };
            let ctx = Arc::clone(&ctx);
            join_set.spawn(async move { (slot, process_item(ctx, item).await) });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        let (slot, outcome) = joined.map_err(|e| RunError::Worker(format!("item task join: {e}")))?;
        let outcome = outcome?;
        tally.record(&outcome).await;
        slots[slot] = Some(outcome);
    }

    for (slot, item) in pending {
        let outcome = ItemOutcome::failed(item, ItemError::Cancelled);
        tally.record(&outcome).await;
        slots[slot] = Some(outcome);
    }

    drop(ctx);
    let builder = {
        let mut guard = archive
            .lock()
            .map_err(|_| RunError::Worker("archive lock poisoned".to_string()))?;
        std::mem::take(&mut *guard)
    };
    let finished = builder.finish(options.archive_name.clone())?;

    let outcomes = slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| RunError::Worker("an item finished without an outcome".to_string()))?;

    let result = RunResult::new(outcomes, cancelled, finished);
    tracing::info!(
        total = result.total(),
        succeeded = result.success_count,
        failed = result.failure_count,
        entries = result.archive.entry_count(),
        cancelled = result.cancelled,
        "run complete"
    );
    Ok(result)
}
