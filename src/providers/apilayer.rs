use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::{CurrencyPair, FetchError, RateFetcher, RawResponse};

/// Stands in for the access key in logged URLs.
const REDACTED_KEY: &str = "<redacted>";

/// Fetches live quotes from the apilayer `api/live` endpoint.
pub struct ApiLayerFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl ApiLayerFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxconv/0.1")
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()?;
        Ok(ApiLayerFetcher {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn live_url(&self, pair: &CurrencyPair, api_key: &str) -> String {
        format!(
            "{}/api/live?access_key={}&currencies={}&source={}&format=1",
            self.base_url, api_key, pair.target, pair.source
        )
    }
}

#[async_trait]
impl RateFetcher for ApiLayerFetcher {
    #[instrument(
        name = "ApiLayerRateFetch",
        skip(self, api_key),
        fields(pair = %pair)
    )]
    async fn fetch(&self, pair: &CurrencyPair, api_key: &str) -> Result<RawResponse, FetchError> {
        debug!(
            "Requesting currency rate from {}",
            self.live_url(pair, REDACTED_KEY)
        );

        let url = self.live_url(pair, api_key);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Quote endpoint returned an error status");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!(body = %body, "Received quote response");
        Ok(RawResponse(body))
    }
}
