//! Core library for postfeed
//!
//! This crate implements the **Functional Core** of postfeed, following the
//! Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! postfeed keeps an incrementally paginated, de-duplicated cache of remote
//! records, memoizes an expensive per-record transform, and tracks a single
//! detail selection whose fetches can be superseded. It is split in two crates:
//!
//! - **`postfeed_core`** (this crate): state machines and pure transformations with zero I/O
//! - **`postfeed`**: HTTP fetching, notifications and the async coordinator (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **No I/O**: nothing in here touches the network or spawns tasks
//! - **Tagged completions**: every fetch is described by a ticket, and the state
//!   machines decide whether a completion is still current by comparing tickets
//! - **Testable**: every transition can be driven with fixture records, no mocking required
//!
//! # Module Organization
//!
//! - [`record`]: `Record` and `PageRequest` value types
//! - [`api`]: endpoint URL building and response decoding
//! - [`transform`]: the memoizing `TransformCache`
//! - [`collection`]: the `PaginatedCollection` state machine (generation counter, single-flight)
//! - [`detail`]: the `DetailSession` state machine (fetch token supersession)
//! - [`snapshot`]: immutable snapshots published to observers
//! - [`error`]: the error taxonomy shared by both crates
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use postfeed_core::collection::{PageOutcome, PaginatedCollection};
//! use std::num::NonZeroU32;
//!
//! let mut collection = PaginatedCollection::new(NonZeroU32::new(10).unwrap());
//! let ticket = collection.load_next_page().expect("idle collection issues a ticket");
//!
//! // A refresh issued before the first page resolves makes `ticket` stale.
//! let fresh = collection.refresh();
//! assert!(collection.complete(ticket, Ok(vec![])).is_err());
//! assert!(matches!(collection.complete(fresh, Ok(vec![])), Ok(PageOutcome::Merged(_))));
//! ```

pub mod api;
pub mod collection;
pub mod detail;
pub mod error;
pub mod record;
pub mod snapshot;
pub mod transform;

pub use error::{FetchError, InvalidPageRequest, StaleResult};
pub use record::{PageRequest, Record, RecordId};
