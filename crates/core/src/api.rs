//! Endpoint URL building and response decoding
//!
//! Pure functions shared by every `PageFetcher` implementation. The remote
//! collection is expected to expose:
//!
//! - `GET {base}/posts?{page}={n}&{limit}={k}` returning a JSON array of records
//! - `GET {base}/posts/{id}` returning a single JSON record

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::record::{PageRequest, Record, RecordId};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_LIMIT_PARAM: &str = "limit";

const POSTS_PATH: &str = "posts";

/// Location of the remote collection and the names of its paging parameters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    page_param: String,
    limit_param: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_BASE_URL)
    }
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Endpoint {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            limit_param: DEFAULT_LIMIT_PARAM.to_string(),
        }
    }

    /// Override the query parameter names (e.g. `_page` / `_limit`).
    pub fn with_params(
        mut self,
        page_param: impl Into<String>,
        limit_param: impl Into<String>,
    ) -> Self {
        self.page_param = page_param.into();
        self.limit_param = limit_param.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, request: &PageRequest) -> String {
        format!(
            "{}/{POSTS_PATH}?{}={}&{}={}",
            self.base_url,
            self.page_param,
            request.page_number(),
            self.limit_param,
            request.page_size()
        )
    }

    pub fn record_url(&self, id: RecordId) -> String {
        format!("{}/{POSTS_PATH}/{id}", self.base_url)
    }
}

/// Decode a page response body into records, preserving response order.
pub fn decode_page(body: &str) -> Result<Vec<Record>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(format!("Invalid page body: {e}")))
}

/// Decode a single-record response body, checking it is the record asked for.
pub fn decode_record(body: &str, expected: RecordId) -> Result<Record, FetchError> {
    let record: Record = serde_json::from_str(body)
        .map_err(|e| FetchError::Decode(format!("Invalid record {expected} body: {e}")))?;

    if record.id != expected {
        return Err(FetchError::Decode(format!(
            "Expected record {expected}, got record {}",
            record.id
        )));
    }

    Ok(record)
}
