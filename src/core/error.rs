//! Error kinds surfaced by the data layer

use thiserror::Error;

/// Failure of an upstream market data fetch. This is the only error a caller of
/// `fetch_with_cache` has to handle; cache problems never surface as one.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {status} for {function}")]
    Status {
        status: reqwest::StatusCode,
        function: &'static str,
    },

    #[error("Failed to parse JSON response for {function}: {source}")]
    Decode {
        function: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Provider error for {function}: {message}")]
    Provider {
        function: &'static str,
        message: String,
    },
}

/// Failure of the key-value store backend.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Stored value is not valid UTF-8 for key: {0}")]
    Encoding(String),
}

impl From<fjall::Error> for StoreError {
    fn from(e: fjall::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Failure reading or writing the persisted watchlist record.
#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("Failed to load watchlists: {0}")]
    Read(#[source] StoreError),

    #[error("Watchlist record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to save watchlists: {0}")]
    Write(#[source] StoreError),
}
