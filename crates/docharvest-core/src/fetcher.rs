//! Asset download: one GET per resolved asset, no retries.

use std::time::Duration;

use crate::error::ItemError;
use crate::http::Transport;
use crate::model::{FetchedPayload, ResolvedAsset};
use crate::url_model;

/// Fetches the bytes at `resolved.asset_url` and derives the candidate entry
/// name from that URL.
///
/// Blocking; call from `spawn_blocking` in async code.
pub fn fetch_asset(
    transport: &dyn Transport,
    resolved: ResolvedAsset,
    timeout: Duration,
) -> Result<FetchedPayload, ItemError> {
    let ResolvedAsset { item, asset_url } = resolved;
    let response = transport
        .get(asset_url.as_str(), timeout)
        .map_err(|e| ItemError::AssetFetch(e.to_string()))?;

    let suggested_name = url_model::derive_candidate_name(asset_url.as_str(), item.position());
    tracing::debug!(
        asset = %asset_url,
        bytes = response.body.len(),
        name = %suggested_name,
        "fetched asset"
    );

    Ok(FetchedPayload {
        item,
        asset_url,
        bytes: response.body,
        suggested_name,
    })
}
