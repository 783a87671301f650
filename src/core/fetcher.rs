//! Rate fetching abstractions

use async_trait::async_trait;
use thiserror::Error;

use super::currency::CurrencyPair;

/// Unparsed body of a quote response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse(pub String);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch(&self, pair: &CurrencyPair, api_key: &str) -> Result<RawResponse, FetchError>;
}
