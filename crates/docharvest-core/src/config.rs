use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default browser-like identifying header; some sites reject bare clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Element that embeds the document viewer on the target pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Tag name, e.g. `iframe`.
    pub element: String,
    /// Value of the element's `id` attribute.
    pub id: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            element: "iframe".to_string(),
            id: "ifrm".to_string(),
        }
    }
}

/// Configuration loaded from `~/.config/docharvest/config.toml`.
/// Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Items processed concurrently (worker pool size).
    pub max_concurrent_items: usize,
    /// Total timeout for fetching a page.
    pub page_timeout_secs: u64,
    /// Total timeout for fetching an asset.
    pub asset_timeout_secs: u64,
    /// Connect timeout for both requests.
    pub connect_timeout_secs: u64,
    pub max_redirects: u32,
    /// Larger bodies abort the transfer and fail the item.
    pub max_asset_bytes: u64,
    pub user_agent: String,
    pub marker: MarkerConfig,
    /// Column names tried, in order, when the input is a table.
    pub input_columns: Vec<String>,
    /// Suggested filename of the finished archive.
    pub archive_name: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_concurrent_items: 4,
            page_timeout_secs: 15,
            asset_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            max_asset_bytes: 256 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            marker: MarkerConfig::default(),
            input_columns: vec![
                "원문(PDF)링크".to_string(),
                "출원번호".to_string(),
                "PDF link".to_string(),
                "application number".to_string(),
            ],
            archive_name: "downloads.zip".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docharvest")?;
    Ok(xdg_dirs
        .get_config_home()
        .join("docharvest")
        .join("config.toml"))
}

/// Load configuration from disk, or built-in defaults if no file exists.
/// Never writes the file.
pub fn load_or_default() -> Result<HarvestConfig> {
    load_from(&config_path()?)
}

/// Like `load_or_default`, for an explicit path.
pub fn load_from(path: &Path) -> Result<HarvestConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(HarvestConfig::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: HarvestConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
