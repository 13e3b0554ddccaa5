use crate::prelude::*;
use futures::future::{BoxFuture, FutureExt};
use log::debug;
use postfeed_core::api::{decode_page, decode_record, Endpoint};
use postfeed_core::{FetchError, PageRequest, Record, RecordId};

use crate::config::FeedConfig;

/// Remote source of records.
///
/// Implementations are stateless and perform exactly one request per call;
/// retrying is left to the caller. Results are applied by the coordinator only
/// if they are still current when they arrive.
pub trait PageFetcher: Send + Sync {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'_, Result<Vec<Record>, FetchError>>;

    fn fetch_record(&self, id: RecordId) -> BoxFuture<'_, Result<Record, FetchError>>;
}

/// `PageFetcher` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpFetcher {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("postfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, config.endpoint()))
    }

    pub fn with_client(client: reqwest::Client, endpoint: Endpoint) -> Self {
        HttpFetcher { client, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(f!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Network(f!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network(f!("Failed to read {url}: {e}")))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'_, Result<Vec<Record>, FetchError>> {
        async move {
            let url = self.endpoint.page_url(&request);
            let body = self.get_body(&url).await?;
            decode_page(&body)
        }
        .boxed()
    }

    fn fetch_record(&self, id: RecordId) -> BoxFuture<'_, Result<Record, FetchError>> {
        async move {
            let url = self.endpoint.record_url(id);
            let body = self.get_body(&url).await?;
            decode_record(&body, id)
        }
        .boxed()
    }
}
