use anyhow::Result;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::HttpConfig;

pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build()?;

    Ok(client)
}
