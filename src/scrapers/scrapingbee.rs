use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::config::ProviderConfig;
use crate::error::{Result, ScrapeError};
use crate::scrapers::PageFetcher;

const GENERIC_PROVIDER_ERROR: &str = "Failed to fetch from scraping provider";
const MAX_ERROR_EXCERPT_CHARS: usize = 500;
const REDACTED: &str = "[redacted]";

/// Fetches pages through the ScrapingBee HTML API. One request per call;
/// failures are returned as-is.
pub struct ScrapingBeeFetcher {
    client: Client,
    config: ProviderConfig,
}

impl ScrapingBeeFetcher {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ScrapeError::ServerConfiguration("API key missing.".to_string()))
    }

    fn query_params(&self, api_key: &str, target_url: &Url) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", api_key.to_string()),
            ("url", target_url.to_string()),
            ("render_js", self.config.render_js.to_string()),
        ];

        if let Some(block) = self.config.block_resources {
            params.push(("block_resources", block.to_string()));
        }

        params
    }
}

#[async_trait]
impl PageFetcher for ScrapingBeeFetcher {
    async fn fetch(&self, target_url: &Url) -> Result<String> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(api_key, target_url))
            .send()
            .await?;

        let status = response.status();
        info!("Scraping provider response status for {}: {}", target_url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Providers echo the request back in some error bodies.
            let message = provider_error_message(&body).replace(api_key, REDACTED);
            warn!("Scraping provider rejected {} with {}: {}", target_url, status, message);

            return Err(ScrapeError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }

    fn check_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }
}

/// Best-effort message from a provider error body: a `message` or `error`
/// field of a JSON body, the JSON itself, or the raw text. Never fails.
pub fn provider_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return GENERIC_PROVIDER_ERROR.to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Null) => GENERIC_PROVIDER_ERROR.to_string(),
        Ok(json) => {
            let field = ["message", "error"]
                .iter()
                .filter_map(|name| json.get(*name))
                .find(|value| is_meaningful(value));

            match field {
                Some(Value::String(text)) => excerpt(text.trim()),
                Some(other) => excerpt(&other.to_string()),
                None => excerpt(&json.to_string()),
            }
        }
        Err(_) => excerpt(trimmed),
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_EXCERPT_CHARS {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(MAX_ERROR_EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}
