use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Missing or malformed caller input: url, selectors, request body.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Server configuration error: {0}")]
    ServerConfiguration(String),

    #[error("Scraping provider error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

impl ScrapeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ScrapeError::InvalidInput(message.into())
    }

    /// HTTP status the boundary answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ScrapeError::InvalidInput(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to hand back to the caller. Unexpected failures are
    /// reduced to a generic sentence; the details only go to the logs.
    pub fn public_message(&self) -> String {
        match self {
            ScrapeError::Unexpected(_) => {
                "An unexpected error occurred during scraping.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the provider API key in its query string.
        ScrapeError::Unexpected(format!("HTTP request failed: {}", e.without_url()))
    }
}
