use crate::model::UpstreamError;
use serde_json::Value;

#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_payload(&self) -> Result<Value, UpstreamError>;
}
