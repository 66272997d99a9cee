use staylist::config::load_config;
use staylist::currency::{CurrencyConverter, ExchangeRateApi};
use staylist::images::ImageTable;
use staylist::repository::ListingRepository;
use staylist::upstream::UpstreamClient;

use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let images = ImageTable::with_overrides(&config.image_overrides);
    let source = Arc::new(UpstreamClient::new(
        config.api_url.clone(),
        config.auth_token.clone(),
    ));
    let repository = ListingRepository::new(source, images);
    let converter = CurrencyConverter::new(
        Arc::new(ExchangeRateApi::new(config.quote_url.clone())),
        config.target_currency.clone(),
    );

    info!("🚀 staylist started");

    // Keep the cache and the rate warm; lookups between cycles are served
    // from memory by the routing layer.
    loop {
        let rate = converter.refresh_rate().await;
        info!("active rate: 1 USD = {:.2} {}", rate, config.target_currency);

        match repository.refresh().await {
            Ok(count) => info!("cycle complete: {} listings cached", count),
            Err(e) => warn!("listing refresh failed: {}", e),
        }

        sleep(Duration::from_secs(config.check_interval_seconds)).await;
    }
}
