use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub auth_token: String,
    pub quote_url: String,
    pub target_currency: String,
    pub check_interval_seconds: u64,
    /// Extra id -> image URL entries merged over the built-in table.
    #[serde(default)]
    pub image_overrides: HashMap<String, String>,
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
