use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Selectors describing a search-results page. Mandatory fields default to
/// empty so that a missing key reports as a missing selector rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrpSelectors {
    #[serde(default)]
    pub product_list_item: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_attribute: Option<String>,
}

/// Selectors describing a single product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdpSelectors {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications_table: String,
    #[serde(default)]
    pub spec_row_key: String,
    #[serde(default)]
    pub spec_row_value: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// SRP selectors with every CSS string parsed. Only obtainable through
/// [`SrpSelectors::compile`].
#[derive(Debug, Clone)]
pub struct CompiledSrpSelectors {
    pub(crate) product_list_item: Selector,
    pub(crate) title: Selector,
    pub(crate) price: Selector,
    pub(crate) link: Selector,
    pub(crate) image_url: Selector,
    pub(crate) image_attribute: Option<String>,
}

/// PDP selectors with every CSS string parsed. Only obtainable through
/// [`PdpSelectors::compile`].
#[derive(Debug, Clone)]
pub struct CompiledPdpSelectors {
    pub(crate) title: Selector,
    pub(crate) price: Selector,
    pub(crate) description: Selector,
    pub(crate) specifications_table: Selector,
    pub(crate) spec_row_key: Selector,
    pub(crate) spec_row_value: Selector,
    pub(crate) main_image: Selector,
    pub(crate) image_attribute: Option<String>,
    pub(crate) sku: Option<Selector>,
}

impl SrpSelectors {
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.product_list_item,
            &self.title,
            &self.price,
            &self.link,
            &self.image_url,
        ];

        if required.iter().any(|s| s.trim().is_empty()) {
            return Err(ScrapeError::invalid_input(
                "Missing required SRP selectors (productListItem, title, price, link, imageUrl)",
            ));
        }

        Ok(())
    }

    pub fn compile(&self) -> Result<CompiledSrpSelectors> {
        self.validate()?;

        Ok(CompiledSrpSelectors {
            product_list_item: parse_selector("productListItem", &self.product_list_item)?,
            title: parse_selector("title", &self.title)?,
            price: parse_selector("price", &self.price)?,
            link: parse_selector("link", &self.link)?,
            image_url: parse_selector("imageUrl", &self.image_url)?,
            image_attribute: non_blank(self.image_attribute.as_deref()),
        })
    }
}

impl PdpSelectors {
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.title,
            &self.price,
            &self.description,
            &self.specifications_table,
            &self.spec_row_key,
            &self.spec_row_value,
            &self.main_image,
        ];

        if required.iter().any(|s| s.trim().is_empty()) {
            return Err(ScrapeError::invalid_input(
                "Missing one or more required PDP selectors (title, price, description, specificationsTable, specRowKey, specRowValue, mainImage)",
            ));
        }

        Ok(())
    }

    pub fn compile(&self) -> Result<CompiledPdpSelectors> {
        self.validate()?;

        let sku = match non_blank(self.sku.as_deref()) {
            Some(css) => Some(parse_selector("sku", &css)?),
            None => None,
        };

        Ok(CompiledPdpSelectors {
            title: parse_selector("title", &self.title)?,
            price: parse_selector("price", &self.price)?,
            description: parse_selector("description", &self.description)?,
            specifications_table: parse_selector(
                "specificationsTable",
                &self.specifications_table,
            )?,
            spec_row_key: parse_selector("specRowKey", &self.spec_row_key)?,
            spec_row_value: parse_selector("specRowValue", &self.spec_row_value)?,
            main_image: parse_selector("mainImage", &self.main_image)?,
            image_attribute: non_blank(self.image_attribute.as_deref()),
            sku,
        })
    }
}

fn parse_selector(field: &str, css: &str) -> Result<Selector> {
    Selector::parse(css.trim()).map_err(|e| {
        ScrapeError::invalid_input(format!(
            "Invalid CSS selector for {} '{}': {}",
            field, css, e
        ))
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
