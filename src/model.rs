// Core structs: Listing, ListingImage
use serde::Serialize;
use thiserror::Error;

/// A normalized listing. Every textual field is guaranteed non-empty: absent
/// upstream values are replaced with fixed placeholders during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub household: String,
    /// Kept in the upstream's original currency/format, never parsed here.
    pub price: String,
    pub house_rules: String,
    pub image_url: Option<String>,
}

/// One entry of the gallery view served alongside the listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingImage {
    pub id: String,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("http request failed: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status code {0}")]
    InvalidStatus(u16),
    #[error("response body is not valid JSON: {0}")]
    MalformedBody(String),
}
