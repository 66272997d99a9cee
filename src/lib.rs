//! Listing normalization and resolution core.
//!
//! Pulls raw listing records from the upstream provider, normalizes them into
//! the canonical [`Listing`] shape with defensive defaults at every field,
//! resolves display images through a fallback chain (record scan, then the
//! vetted table), and keeps the latest set in memory for the routing layer to
//! serve. A small currency converter tracks the active USD -> target rate for
//! price presentation.

pub mod config;
pub mod currency;
pub mod images;
pub mod model;
pub mod normalizer;
pub mod repository;
pub mod upstream;

pub use config::{load_config, AppConfig};
pub use currency::{CurrencyConverter, ExchangeRateApi, QuoteSource};
pub use images::{resolve_image, ImageTable};
pub use model::{Listing, ListingImage, UpstreamError};
pub use normalizer::{normalize_images, normalize_listings};
pub use repository::ListingRepository;
pub use upstream::{ListingSource, UpstreamClient};
