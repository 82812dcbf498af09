//! Product page metadata fetcher.
//!
//! Fetches a remote page and extracts Open Graph and common fallback
//! fields so the client can pre-fill an item form. Parsing is split out
//! as a pure function over the HTML body so it can be tested without a
//! network.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;

use domain::models::UrlMetadata;

use crate::config::MetadataConfig;
use crate::error::ApiError;

lazy_static! {
    static ref PRICE_RE: Regex = Regex::new(r"\d+(?:[.,]\d{1,2})?").expect("valid price regex");
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl From<MetadataError> for ApiError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::InvalidUrl(msg) => ApiError::Validation(msg),
            MetadataError::Timeout => ApiError::Timeout("Page fetch timed out".into()),
            MetadataError::Status(code) => {
                ApiError::Validation(format!("Could not fetch page (status {})", code))
            }
            MetadataError::Fetch(e) => ApiError::Validation(format!("Could not fetch page: {}", e)),
        }
    }
}

/// HTTP client wrapper for scraping product pages.
#[derive(Clone)]
pub struct MetadataFetcher {
    client: Client,
}

impl MetadataFetcher {
    pub fn new(config: &MetadataConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetch a page and extract its metadata.
    pub async fn fetch(&self, url: &str) -> Result<UrlMetadata, MetadataError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(MetadataError::InvalidUrl(
                "URL must use http or https".into(),
            ));
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MetadataError::Timeout
            } else {
                MetadataError::Fetch(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(MetadataError::Fetch)?;
        Ok(parse_document(&body))
    }
}

/// Extract metadata from an HTML document.
///
/// Preference order per field: Open Graph tags, then standard HTML
/// fallbacks, then a best-effort scan of price-looking elements.
pub fn parse_document(html: &str) -> UrlMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "meta[property=\"og:title\"]")
        .or_else(|| element_text(&document, "title"));

    let description = meta_content(&document, "meta[property=\"og:description\"]")
        .or_else(|| meta_content(&document, "meta[name=\"description\"]"));

    let image_url = meta_content(&document, "meta[property=\"og:image\"]");

    let price = meta_content(&document, "meta[property=\"og:price:amount\"]")
        .or_else(|| meta_content(&document, "meta[property=\"product:price:amount\"]"))
        .or_else(|| meta_content(&document, "meta[itemprop=\"price\"]"))
        .or_else(|| scan_price_elements(&document));

    let currency = meta_content(&document, "meta[property=\"og:price:currency\"]")
        .or_else(|| meta_content(&document, "meta[property=\"product:price:currency\"]"))
        .or_else(|| meta_content(&document, "meta[itemprop=\"priceCurrency\"]"));

    UrlMetadata {
        title,
        description,
        image_url,
        price,
        currency,
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Last-resort price detection: the first numeric token inside an element
/// whose class mentions "price".
fn scan_price_elements(document: &Html) -> Option<String> {
    let selector = Selector::parse("[class*=\"price\"]").ok()?;
    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        if let Some(m) = PRICE_RE.find(&text) {
            return Some(m.as_str().replace(',', "."));
        }
    }
    None
}
