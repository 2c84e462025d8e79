//! One item through resolve → fetch → name → archive.
//!
//! Network calls and archive writes run on the blocking pool. The archive
//! lock is taken only inside the name-and-append step, never across I/O.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::archive::ArchiveBuilder;
use crate::checksum;
use crate::error::{ItemError, RunError};
use crate::fetcher::fetch_asset;
use crate::http::Transport;
use crate::model::{ArchivedEntry, ItemOutcome, SourceItem};
use crate::resolver::{resolve_page, AssetLocator};

/// Per-item lifecycle. `Archived` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Resolving,
    Fetching,
    Naming,
    Archived,
    Failed,
}

impl ItemState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemState::Archived | ItemState::Failed)
    }
}

/// Shared by every worker of one run.
pub(crate) struct ItemContext {
    pub transport: Arc<dyn Transport>,
    pub locator: Arc<dyn AssetLocator>,
    pub archive: Arc<Mutex<ArchiveBuilder>>,
    pub page_timeout: Duration,
    pub asset_timeout: Duration,
}

struct Tracker<'a> {
    item: &'a SourceItem,
    state: ItemState,
}

impl<'a> Tracker<'a> {
    fn new(item: &'a SourceItem) -> Self {
        Self {
            item,
            state: ItemState::Pending,
        }
    }

    fn enter(&mut self, next: ItemState) {
        tracing::debug!(
            index = self.item.index,
            url = %self.item.url,
            from = ?self.state,
            to = ?next,
            "item state"
        );
        self.state = next;
    }

    fn fail(mut self, error: ItemError) -> ItemOutcome {
        tracing::warn!(
            url = %self.item.url,
            stage = ?self.state,
            reason = %error,
            "item failed"
        );
        self.enter(ItemState::Failed);
        ItemOutcome::failed(self.item.clone(), error)
    }
}

/// Drives `item` to a terminal state. Item-scoped failures come back as a
/// failed `ItemOutcome`; only run-fatal problems are `Err`.
pub(crate) async fn process_item(
    ctx: Arc<ItemContext>,
    item: SourceItem,
) -> Result<ItemOutcome, RunError> {
    let mut tracker = Tracker::new(&item);

    tracker.enter(ItemState::Resolving);
    let resolved = tokio::task::spawn_blocking({
        let ctx = Arc::clone(&ctx);
        let item = item.clone();
        move || {
            resolve_page(
                ctx.transport.as_ref(),
                ctx.locator.as_ref(),
                &item,
                ctx.page_timeout,
            )
        }
    })
    .await
    .map_err(|e| RunError::Worker(format!("resolve task join: {e}")))?;
    let resolved = match resolved {
        Ok(r) => r,
        Err(e) => return Ok(tracker.fail(e)),
    };

    tracker.enter(ItemState::Fetching);
    let payload = tokio::task::spawn_blocking({
        let ctx = Arc::clone(&ctx);
        move || fetch_asset(ctx.transport.as_ref(), resolved, ctx.asset_timeout)
    })
    .await
    .map_err(|e| RunError::Worker(format!("fetch task join: {e}")))?;
    let payload = match payload {
        Ok(p) => p,
        Err(e) => return Ok(tracker.fail(e)),
    };

    tracker.enter(ItemState::Naming);
    let asset_url = payload.asset_url.to_string();
    let size_bytes = payload.bytes.len() as u64;
    let sha256 = checksum::sha256_hex(&payload.bytes);
    let entry_name = tokio::task::spawn_blocking({
        let archive = Arc::clone(&ctx.archive);
        move || -> Result<String, RunError> {
            let mut archive = archive
                .lock()
                .map_err(|_| RunError::Worker("archive lock poisoned".to_string()))?;
            Ok(archive.append(&payload.suggested_name, &payload.bytes)?)
        }
    })
    .await
    .map_err(|e| RunError::Worker(format!("archive task join: {e}")))??;

    tracker.enter(ItemState::Archived);
    tracing::info!(url = %item.url, entry = %entry_name, size_bytes, "archived");
    Ok(ItemOutcome::archived(
        item.clone(),
        ArchivedEntry {
            entry_name,
            asset_url,
            size_bytes,
            sha256,
        },
    ))
}
