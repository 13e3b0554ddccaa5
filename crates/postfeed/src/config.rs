use crate::prelude::*;
use postfeed_core::api::{Endpoint, DEFAULT_BASE_URL, DEFAULT_LIMIT_PARAM, DEFAULT_PAGE_PARAM};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::coordinator::CoordinatorOptions;

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the remote collection and the coordinator.
///
/// Host applications can `FeedConfig::parse()` it directly or
/// `#[command(flatten)]` it into their own CLI.
#[derive(Debug, Clone, clap::Parser, serde::Serialize, serde::Deserialize)]
#[command(name = "postfeed")]
pub struct FeedConfig {
    /// Base URL of the remote collection (the host serving `/posts`)
    #[arg(long, env = "POSTFEED_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of records per page
    #[arg(
        long,
        env = "POSTFEED_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    /// Request timeout in seconds
    #[arg(long, env = "POSTFEED_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Query parameter carrying the page number
    #[arg(long, env = "POSTFEED_PAGE_PARAM", default_value = DEFAULT_PAGE_PARAM)]
    pub page_param: String,

    /// Query parameter carrying the page size
    #[arg(long, env = "POSTFEED_LIMIT_PARAM", default_value = DEFAULT_LIMIT_PARAM)]
    pub limit_param: String,

    /// Do not load the first page when the coordinator starts
    #[arg(long, env = "POSTFEED_NO_INITIAL_LOAD")]
    pub no_initial_load: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT_SECS,
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            limit_param: DEFAULT_LIMIT_PARAM.to_string(),
            no_initial_load: false,
        }
    }
}

impl FeedConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.base_url).with_params(&self.page_param, &self.limit_param)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn coordinator_options(&self) -> Result<CoordinatorOptions> {
        let page_size = NonZeroU32::new(self.page_size)
            .ok_or_else(|| Error::Config("page size must be greater than 0".to_string()))?;

        Ok(CoordinatorOptions {
            page_size,
            load_on_start: !self.no_initial_load,
        })
    }
}
