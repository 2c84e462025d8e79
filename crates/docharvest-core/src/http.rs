//! Blocking HTTP GET used by the page resolver and the asset fetcher.
//!
//! Uses the curl crate (libcurl). Every call runs on the current thread; the
//! pipeline drives it from `spawn_blocking`.

use std::time::Duration;

use thiserror::Error;

use crate::config::HarvestConfig;

/// A successful (2xx) response with its body buffered in memory.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub body: Vec<u8>,
    /// URL after redirects, if the transport knows it.
    pub effective_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// One GET with a total timeout. Non-2xx statuses are errors.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError>;
}

/// libcurl-backed transport. Cheap to share; each call builds its own handle.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
    connect_timeout: Duration,
    max_redirects: u32,
    max_body_bytes: u64,
}

impl CurlTransport {
    pub fn new(cfg: &HarvestConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            max_redirects: cfg.max_redirects,
            max_body_bytes: cfg.max_asset_bytes,
        }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)
            .map_err(|_| HttpError::InvalidUrl(url.to_string()))?;
        easy.useragent(&self.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirects)?;
        easy.accept_encoding("")?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(timeout)?;

        let mut body: Vec<u8> = Vec::new();
        let mut too_large = false;
        let limit = self.max_body_bytes;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if body.len() as u64 + data.len() as u64 > limit {
                    too_large = true;
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if too_large {
            return Err(HttpError::TooLarge { limit });
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(HttpError::Status {
                url: url.to_string(),
                code,
            });
        }

        let effective_url = easy.effective_url()?.map(str::to_string);
        Ok(HttpResponse {
            body,
            effective_url,
        })
    }
}
