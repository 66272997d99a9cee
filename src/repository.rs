// In-memory cache of the latest normalized listing set.
use crate::images::ImageTable;
use crate::model::{Listing, ListingImage, UpstreamError};
use crate::normalizer::{normalize_images, normalize_listings};
use crate::upstream::ListingSource;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Holds the most recently normalized listing set. Rebuilt wholesale on each
/// refresh; nothing is merged incrementally and nothing survives a restart.
pub struct ListingRepository {
    source: Arc<dyn ListingSource>,
    images: ImageTable,
    listings: Mutex<Vec<Listing>>,
}

impl ListingRepository {
    pub fn new(source: Arc<dyn ListingSource>, images: ImageTable) -> Self {
        Self {
            source,
            images,
            listings: Mutex::new(Vec::new()),
        }
    }

    /// Fetches and renormalizes the full listing set, replacing the stored
    /// sequence in a single assignment. Overlapping refreshes are not
    /// coalesced; the last one to complete wins.
    pub async fn refresh(&self) -> Result<usize, UpstreamError> {
        let payload = self.source.fetch_payload().await?;
        let normalized = normalize_listings(&payload, &self.images);
        let count = normalized.len();
        *self.listings.lock().await = normalized;
        info!("listing cache refreshed: {} listings", count);
        Ok(count)
    }

    /// Current listing set, refreshed unconditionally first.
    pub async fn get_all(&self) -> Result<Vec<Listing>, UpstreamError> {
        self.refresh().await?;
        Ok(self.listings.lock().await.clone())
    }

    /// Lookup against the stored set, refreshing once if it was never
    /// populated. A hit whose image is still unresolved is backfilled from
    /// the vetted table; a miss is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Listing>, UpstreamError> {
        if self.listings.lock().await.is_empty() {
            self.refresh().await?;
        }

        let mut listings = self.listings.lock().await;
        let Some(listing) = listings.iter_mut().find(|listing| listing.id == id) else {
            return Ok(None);
        };

        if listing.image_url.is_none() {
            listing.image_url = self.images.lookup(&listing.id).map(str::to_string);
        }

        Ok(Some(listing.clone()))
    }

    /// Latest gallery entries, extracted from a fresh fetch. An unusable
    /// payload degrades to the vetted table inside the normalizer.
    pub async fn get_images(&self) -> Result<Vec<ListingImage>, UpstreamError> {
        let payload = self.source.fetch_payload().await?;
        Ok(normalize_images(&payload, &self.images))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a swappable payload and counts fetches; `None` means the
    /// upstream is unreachable.
    struct StubSource {
        payload: std::sync::Mutex<Option<Value>>,
        fetches: AtomicUsize,
    }

    impl StubSource {
        fn new(payload: Option<Value>) -> Arc<Self> {
            Arc::new(Self {
                payload: std::sync::Mutex::new(payload),
                fetches: AtomicUsize::new(0),
            })
        }

        fn set_payload(&self, payload: Value) {
            *self.payload.lock().unwrap() = Some(payload);
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ListingSource for StubSource {
        async fn fetch_payload(&self) -> Result<Value, UpstreamError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.payload
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| UpstreamError::Http("upstream offline".to_string()))
        }
    }

    fn success_payload(records: Vec<Value>) -> Value {
        json!({ "status": "success", "result": records })
    }

    fn repository(source: Arc<StubSource>) -> ListingRepository {
        ListingRepository::new(source, ImageTable::builtin())
    }

    #[tokio::test]
    async fn get_all_refreshes_on_every_call() {
        let source = StubSource::new(Some(success_payload(vec![json!({ "id": "305069" })])));
        let repo = repository(source.clone());

        let listings = repo.get_all().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "305069");

        repo.get_all().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn get_by_id_populates_the_store_only_once() {
        let source = StubSource::new(Some(success_payload(vec![
            json!({ "id": "305069", "name": "Villa A" }),
            json!({ "id": "999999" }),
        ])));
        let repo = repository(source.clone());

        let listing = repo.get_by_id("305069").await.unwrap().unwrap();
        assert_eq!(listing.name, "Villa A");
        assert_eq!(source.fetch_count(), 1);

        repo.get_by_id("999999").await.unwrap().unwrap();
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn get_by_id_supplies_an_image_whenever_the_table_can() {
        let source = StubSource::new(Some(success_payload(vec![
            json!({ "id": "305069" }),
            json!({ "id": "999999" }),
        ])));
        let repo = repository(source);

        let vetted = repo.get_by_id("305069").await.unwrap().unwrap();
        assert!(vetted.image_url.is_some());

        let unknown = repo.get_by_id("999999").await.unwrap().unwrap();
        assert_eq!(unknown.image_url, None);
    }

    #[tokio::test]
    async fn get_by_id_miss_is_not_an_error() {
        let source = StubSource::new(Some(success_payload(vec![json!({ "id": "305069" })])));
        let repo = repository(source);

        assert!(repo.get_by_id("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_the_stored_set_wholesale() {
        let source = StubSource::new(Some(success_payload(vec![
            json!({ "id": "1" }),
            json!({ "id": "2" }),
        ])));
        let repo = repository(source.clone());
        repo.refresh().await.unwrap();

        source.set_payload(success_payload(vec![json!({ "id": "3" })]));
        repo.refresh().await.unwrap();

        let listings = repo.get_all().await.unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["3"]);
        assert!(repo.get_by_id("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_to_the_caller() {
        let source = StubSource::new(None);
        let repo = repository(source);

        assert!(matches!(repo.get_all().await, Err(UpstreamError::Http(_))));
        assert!(matches!(
            repo.get_by_id("305069").await,
            Err(UpstreamError::Http(_))
        ));
    }

    #[tokio::test]
    async fn invalid_envelope_degrades_to_an_empty_set() {
        let source = StubSource::new(Some(json!({ "status": "error" })));
        let repo = repository(source);

        assert!(repo.get_all().await.unwrap().is_empty());
        assert!(repo.get_by_id("305069").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_images_resolves_and_filters() {
        let source = StubSource::new(Some(success_payload(vec![
            json!({ "id": "1", "name": "Pictured", "imageUrl": "https://img.example.com/1.jpg" }),
            json!({ "id": "999999", "name": "Dropped" }),
        ])));
        let repo = repository(source);

        let images = repo.get_images().await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://img.example.com/1.jpg");
    }

    #[tokio::test]
    async fn get_images_dumps_the_table_on_invalid_envelope() {
        let source = StubSource::new(Some(json!({ "status": "error" })));
        let repo = repository(source);

        assert_eq!(repo.get_images().await.unwrap().len(), 10);
    }
}
