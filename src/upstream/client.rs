use crate::model::UpstreamError;
use crate::upstream::traits::ListingSource;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

/// Listings-provider client: one GET against the configured base URL with a
/// static authorization header. No timeout is enforced at this layer; the
/// transport's defaults apply.
pub struct UpstreamClient {
    client: Client,
    api_url: String,
    auth_token: String,
}

impl UpstreamClient {
    pub fn new(api_url: String, auth_token: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            auth_token,
        }
    }
}

#[async_trait::async_trait]
impl ListingSource for UpstreamClient {
    async fn fetch_payload(&self) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(&self.api_url)
            .header(AUTHORIZATION, self.auth_token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(UpstreamError::InvalidStatus(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Http(e.to_string()))?;
        parse_payload(&body)
    }
}

/// Some provider deployments double-encode the body as a JSON string; unwrap
/// one level before handing the payload to the normalizer.
fn parse_payload(body: &str) -> Result<Value, UpstreamError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;

    match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|e| UpstreamError::MalformedBody(e.to_string()))
        }
        value => Ok(value),
    }
}
