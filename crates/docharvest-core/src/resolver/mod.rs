//! Page resolution: fetch a page and find the address of the document it
//! embeds.
//!
//! The pipeline only depends on the `AssetLocator` trait; the marker-element
//! convention of the target site lives in `MarkerFrameLocator`.

mod marker;

pub use marker::{InvalidMarker, MarkerFrameLocator};

use std::time::Duration;

use url::Url;

use crate::error::ItemError;
use crate::http::Transport;
use crate::model::{ResolvedAsset, SourceItem};

/// Extraction strategy: page HTML plus the page URL in, absolute asset URL out.
pub trait AssetLocator: Send + Sync {
    fn locate(&self, html: &str, page_url: &Url) -> Option<Url>;
}

/// Fetches `item`'s page and locates the embedded asset.
///
/// Relative `src` values resolve against the page URL after redirects, not
/// the raw input string. Blocking; call from `spawn_blocking` in async code.
pub fn resolve_page(
    transport: &dyn Transport,
    locator: &dyn AssetLocator,
    item: &SourceItem,
    timeout: Duration,
) -> Result<ResolvedAsset, ItemError> {
    let page = transport
        .get(&item.url, timeout)
        .map_err(|e| ItemError::PageFetch(e.to_string()))?;

    let base = page.effective_url.as_deref().unwrap_or(&item.url);
    let page_url = Url::parse(base)
        .map_err(|e| ItemError::PageFetch(format!("invalid page URL {base}: {e}")))?;

    let html = String::from_utf8_lossy(&page.body);
    let asset_url = locator
        .locate(&html, &page_url)
        .ok_or(ItemError::AssetNotFound)?;

    tracing::debug!(page = %page_url, asset = %asset_url, "resolved embedded asset");
    Ok(ResolvedAsset {
        item: item.clone(),
        asset_url,
    })
}
