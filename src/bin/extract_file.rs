//! Runs an extractor over a saved HTML page, so selector sets can be tried
//! out without going through the scraping provider.
//!
//! ```text
//! extract_file srp --html listing.html --selectors srp.json --page-url https://dealer.example/uhren
//! extract_file pdp --html product.html --selectors pdp.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use watch_scrape::models::{PdpSelectors, SrpSelectors};
use watch_scrape::parsers::{extract_detail, extract_list};

#[derive(Parser)]
#[command(name = "extract_file")]
#[command(about = "Extract products from a saved HTML page using a selector set", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract product summaries from a search-results page
    Srp {
        /// Saved HTML file
        #[arg(long)]
        html: PathBuf,
        /// JSON file with SRP selectors
        #[arg(long)]
        selectors: PathBuf,
        /// URL the page was fetched from, used to resolve relative links
        #[arg(long)]
        page_url: String,
    },
    /// Extract product details from a product page
    Pdp {
        /// Saved HTML file
        #[arg(long)]
        html: PathBuf,
        /// JSON file with PDP selectors
        #[arg(long)]
        selectors: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Srp {
            html,
            selectors,
            page_url,
        } => {
            let selectors: SrpSelectors = read_json(&selectors)?;
            let selectors = selectors.compile()?;
            let page_url = Url::parse(&page_url)
                .with_context(|| format!("Invalid page URL: {}", page_url))?;
            let html = read_html(&html)?;

            let products = extract_list(&html, &selectors, &page_url);
            eprintln!("Found {} products", products.len());
            json!({ "products": products })
        }
        Commands::Pdp { html, selectors } => {
            let selectors: PdpSelectors = read_json(&selectors)?;
            let selectors = selectors.compile()?;
            let html = read_html(&html)?;

            json!({ "details": extract_detail(&html, &selectors) })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_html(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse selectors in {}", path.display()))
}
