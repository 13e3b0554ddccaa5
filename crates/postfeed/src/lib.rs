//! Imperative shell for postfeed
//!
//! Wires the pure state machines from [`postfeed_core`] to the outside world:
//!
//! - [`config`]: `FeedConfig`, parsed from flags or `POSTFEED_*` environment variables
//! - [`fetcher`]: the `PageFetcher` seam and its reqwest-backed `HttpFetcher`
//! - [`notify`]: fire-and-forget page-load notifications
//! - [`coordinator`]: the tokio task that serializes commands and fetch completions
//!   and publishes snapshots
//!
//! ```rust,ignore
//! use postfeed::{Coordinator, FeedConfig, LogNotifier};
//! use std::sync::Arc;
//!
//! let coordinator = Coordinator::from_config(&FeedConfig::default(), Arc::new(LogNotifier))?;
//! let snapshot = coordinator.load_next_page().await?;
//! for derived in coordinator.derived(&snapshot) {
//!     println!("{}: {}", derived.for_record_id, derived.value);
//! }
//! ```
//!
//! Logging goes through the `log` facade; install any logger (e.g. `env_logger`)
//! and set `RUST_LOG=postfeed=debug,postfeed_core=debug` to see stale
//! completions being discarded.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod notify;
pub mod prelude;

pub use config::FeedConfig;
pub use coordinator::{Command, Coordinator, CoordinatorOptions};
pub use error::Error;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use notify::{FetchNotice, LogNotifier, NoopNotifier, Notifier, NotifyError};

// Re-export domain types from core
pub use postfeed_core::collection::Phase;
pub use postfeed_core::snapshot::{CollectionSnapshot, SelectionSnapshot, Snapshot};
pub use postfeed_core::transform::{DerivedValue, TransformCache};
pub use postfeed_core::{FetchError, PageRequest, Record, RecordId};
