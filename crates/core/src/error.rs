use serde::{Deserialize, Serialize};

/// Failure of a single page or record fetch.
///
/// Both variants are recoverable by re-issuing the command that caused them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// A completion arrived for a fetch that is no longer current.
///
/// `issued` is the generation (or fetch token) captured when the fetch started,
/// `current` is the value held by the state machine when it completed. This is
/// bookkeeping only and never reaches a snapshot.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Stale result discarded: issued at {issued}, current is {current}")]
pub struct StaleResult {
    pub issued: u64,
    pub current: u64,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPageRequest {
    #[error("Page number must be at least 1")]
    PageNumber,

    #[error("Page size must be greater than 0")]
    PageSize,
}
