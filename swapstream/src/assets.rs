use std::time::Duration;

use corelib::models::swap_models::SwapAsset;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::StreamError;

/// Plain HTTP client for the aggregation service's REST surface.
#[derive(Clone)]
pub struct SwapApiClient {
    http: Client,
    base_url: String,
}

impl SwapApiClient {
    pub fn new(base_url: String) -> Result<Self, StreamError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Fetch the list of swappable assets.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_swap_assets(&self) -> Result<Vec<SwapAsset>, StreamError> {
        let url = format!("{}/v2/swap/assets", self.base_url);

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let assets: Vec<SwapAsset> = resp.json().await?;

        debug!(count = assets.len(), "swap assets fetched");
        Ok(assets)
    }
}
