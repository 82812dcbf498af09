//! Scraped page metadata used for item auto-fill.

use serde::{Deserialize, Serialize};

/// Metadata extracted from a product page.
///
/// All fields are best-effort; the price is kept as the raw scraped string
/// so the client can present it for confirmation before saving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
}
