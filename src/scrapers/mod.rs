use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::models::{CompiledPdpSelectors, CompiledSrpSelectors, ProductDetail, ProductSummary};
use crate::parsers::{extract_detail, extract_list};

mod scrapingbee;

pub use scrapingbee::{provider_error_message, ScrapingBeeFetcher};

/// Retrieves the rendered HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, target_url: &Url) -> Result<String>;

    /// Fails when the fetcher cannot issue requests at all, e.g. a missing
    /// provider credential.
    fn check_configured(&self) -> Result<()> {
        Ok(())
    }
}

/// Fetch-then-extract pipelines. Holds no state besides the fetcher.
#[derive(Clone)]
pub struct ScrapeService {
    fetcher: Arc<dyn PageFetcher>,
}

impl ScrapeService {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn check_configured(&self) -> Result<()> {
        self.fetcher.check_configured()
    }

    pub async fn fetch_raw(&self, target_url: &Url) -> Result<String> {
        info!("Attempting to scrape URL: {}", target_url);
        self.fetcher.fetch(target_url).await
    }

    pub async fn scrape_listing(
        &self,
        target_url: &Url,
        selectors: &CompiledSrpSelectors,
    ) -> Result<Vec<ProductSummary>> {
        info!("Attempting to scrape SRP: {}", target_url);
        let html = self.fetcher.fetch(target_url).await?;

        let products = extract_list(&html, selectors, target_url);
        info!("Found {} products on {}", products.len(), target_url);
        for product in &products {
            debug!("{}", product);
        }

        Ok(products)
    }

    pub async fn scrape_details(
        &self,
        target_url: &Url,
        selectors: &CompiledPdpSelectors,
    ) -> Result<ProductDetail> {
        info!("Attempting to scrape PDP: {}", target_url);
        let html = self.fetcher.fetch(target_url).await?;

        let details = extract_detail(&html, selectors);
        info!(
            "Extracted {} specifications from {}",
            details.specifications.len(),
            target_url
        );

        Ok(details)
    }
}
