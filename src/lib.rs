pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod utils;

pub use error::{Result, ScrapeError};
