/// Runtime settings, overridable through the `settings` storage key
use serde::{Deserialize, Serialize};

use crate::host::Host;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// MediaWiki `api.php` endpoint
    pub api_base: String,
    /// Prefix for article links; the URL-encoded title is appended
    pub article_base: String,
    pub result_limit: u32,
    pub request_timeout_ms: u32,
    /// Shown when a search hit has no snippet
    pub placeholder_description: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: "https://consumerrights.wiki/api.php".to_string(),
            article_base: "https://consumerrights.wiki/".to_string(),
            result_limit: 20,
            request_timeout_ms: 8_000,
            placeholder_description: "No preview available".to_string(),
        }
    }
}

impl Config {
    /// Load settings from extension storage, falling back to defaults
    pub async fn load<H: Host + ?Sized>(host: &H) -> Config {
        match host.store_get(SETTINGS_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring invalid settings: {}", e);
                    Config::default()
                }
            },
            Ok(None) => Config::default(),
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Config::default()
            }
        }
    }
}
