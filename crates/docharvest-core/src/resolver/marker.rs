//! Marker-element locator: the first `<element id="...">` with a `src`.

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::AssetLocator;
use crate::config::MarkerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid marker element name '{0}'")]
pub struct InvalidMarker(pub String);

/// Finds the first element named `element` whose `id` equals `id` and
/// resolves its `src` attribute against the page URL.
#[derive(Debug, Clone)]
pub struct MarkerFrameLocator {
    element: String,
    id: String,
}

impl MarkerFrameLocator {
    pub fn new(element: impl Into<String>, id: impl Into<String>) -> Result<Self, InvalidMarker> {
        let element = element.into();
        if Selector::parse(&element).is_err() {
            return Err(InvalidMarker(element));
        }
        Ok(Self {
            element,
            id: id.into(),
        })
    }

    pub fn from_config(marker: &MarkerConfig) -> Result<Self, InvalidMarker> {
        Self::new(marker.element.clone(), marker.id.clone())
    }
}

impl AssetLocator for MarkerFrameLocator {
    fn locate(&self, html: &str, page_url: &Url) -> Option<Url> {
        let selector = Selector::parse(&self.element).ok()?;
        let document = Html::parse_document(html);
        let marker = document
            .select(&selector)
            .find(|el| el.value().id() == Some(self.id.as_str()))?;

        let src = marker.value().attr("src")?.trim();
        if src.is_empty() {
            return None;
        }
        let resolved = page_url.join(src).ok()?;
        // javascript:, about:blank and the like are not documents.
        matches!(resolved.scheme(), "http" | "https").then_some(resolved)
    }
}
