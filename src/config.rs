use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "watch-scrape.toml";
pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";
pub const API_KEY_ENV: &str = "SCRAPINGBEE_API_KEY";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub render_js: bool,
    #[serde(default)]
    pub block_resources: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub pool_max_idle_per_host: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
}

impl Config {
    /// Defaults, then the optional config file, then `WATCH_SCRAPE__*`
    /// environment variables, then `SCRAPINGBEE_API_KEY`.
    pub fn load() -> Result<Self> {
        let path = std::env::var("WATCH_SCRAPE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let settings = Self::builder_with_defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("WATCH_SCRAPE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("provider.api_key", std::env::var(API_KEY_ENV).ok())?
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = config::Config::builder()
            .set_default("server.bind_addr", "127.0.0.1:3000")?
            .set_default("provider.endpoint", DEFAULT_PROVIDER_ENDPOINT)?
            .set_default("provider.render_js", false)?
            .set_default("http.user_agent", DEFAULT_USER_AGENT)?
            .set_default("http.timeout_seconds", 60_i64)?
            .set_default("http.pool_max_idle_per_host", 6_i64)?
            .set_default("logging.json", false)?;

        Ok(builder)
    }

    pub fn api_key_configured(&self) -> bool {
        self.provider
            .api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}
