// USD -> target currency rate, refreshed per cycle with a constant fallback.
use crate::model::UpstreamError;

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Rate assumed until the first successful quote.
pub const DEFAULT_USD_RATE: f64 = 278.0;
/// Rate applied whenever a refresh fails. The converter never keeps a stale
/// previously-fetched value across a failure.
pub const FALLBACK_USD_RATE: f64 = 278.41;

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    conversion_rates: HashMap<String, f64>,
}

#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError>;
}

/// Quote endpoint client, expecting `{ "conversion_rates": { CODE: rate } }`.
pub struct ExchangeRateApi {
    client: reqwest::Client,
    quote_url: String,
}

impl ExchangeRateApi {
    pub fn new(quote_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            quote_url,
        }
    }
}

#[async_trait::async_trait]
impl QuoteSource for ExchangeRateApi {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError> {
        let response = self
            .client
            .get(&self.quote_url)
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

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;
        Ok(quote.conversion_rates)
    }
}

/// Holds the active USD -> target rate for the presentation layer.
pub struct CurrencyConverter {
    source: Arc<dyn QuoteSource>,
    target_code: String,
    rate: Mutex<f64>,
}

impl CurrencyConverter {
    pub fn new(source: Arc<dyn QuoteSource>, target_code: String) -> Self {
        Self {
            source,
            target_code,
            rate: Mutex::new(DEFAULT_USD_RATE),
        }
    }

    /// Best-effort refresh: every call re-fetches. Failures are absorbed here
    /// so listing retrieval is never blocked on the quote provider; a failed
    /// or incomplete quote resets the rate to the fallback constant.
    pub async fn refresh_rate(&self) -> f64 {
        let fresh = match self.source.fetch_rates().await {
            Ok(rates) => match rates.get(&self.target_code) {
                Some(rate) => {
                    info!("updated exchange rate: 1 USD = {} {}", rate, self.target_code);
                    *rate
                }
                None => {
                    warn!(
                        "quote response has no {} entry, using fallback rate",
                        self.target_code
                    );
                    FALLBACK_USD_RATE
                }
            },
            Err(e) => {
                warn!("failed to fetch USD -> {} rate: {}", self.target_code, e);
                FALLBACK_USD_RATE
            }
        };

        *self.rate.lock().await = fresh;
        fresh
    }

    /// Active rate, read-only to consumers.
    pub async fn current_rate(&self) -> f64 {
        *self.rate.lock().await
    }
}
