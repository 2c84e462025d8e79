//! `docharvest resolve <url>` – show which document a page embeds.

use anyhow::{Context, Result};
use docharvest_core::config::HarvestConfig;
use docharvest_core::http::CurlTransport;
use docharvest_core::input::is_http_url;
use docharvest_core::resolver::{resolve_page, MarkerFrameLocator};
use docharvest_core::SourceItem;
use std::time::Duration;

pub async fn run_resolve(cfg: &HarvestConfig, url: &str) -> Result<()> {
    let url = url.trim();
    if !is_http_url(url) {
        anyhow::bail!("not an http(s) link: {}", url);
    }
    let transport = CurlTransport::new(cfg);
    let locator = MarkerFrameLocator::from_config(&cfg.marker)?;
    let timeout = Duration::from_secs(cfg.page_timeout_secs);
    let item = SourceItem::new(0, url);

    let resolved = tokio::task::spawn_blocking(move || {
        resolve_page(&transport, &locator, &item, timeout)
    })
    .await
    .context("resolve task join")?
    .with_context(|| format!("resolve {}", url))?;

    println!("{}", resolved.asset_url);
    Ok(())
}
