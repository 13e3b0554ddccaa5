//! Immutable state snapshots handed to observers.

use serde::Serialize;

use crate::collection::{PaginatedCollection, Phase};
use crate::detail::DetailSession;
use crate::error::FetchError;
use crate::record::{Record, RecordId};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot {
    pub records: Vec<Record>,
    pub current_page: u32,
    pub page_size: u32,
    pub fetch_in_flight: bool,
    pub phase: Phase,
    pub generation: u64,
    pub reached_end: bool,
    pub last_error: Option<FetchError>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub selected_id: Option<RecordId>,
    pub detail: Option<Record>,
    pub fetch_token: u64,
    pub pending: bool,
    pub last_error: Option<FetchError>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub collection: CollectionSnapshot,
    pub selection: SelectionSnapshot,
}

impl From<&PaginatedCollection> for CollectionSnapshot {
    fn from(collection: &PaginatedCollection) -> Self {
        CollectionSnapshot {
            records: collection.records().to_vec(),
            current_page: collection.current_page(),
            page_size: collection.page_size().get(),
            fetch_in_flight: collection.is_fetching(),
            phase: collection.phase(),
            generation: collection.generation(),
            reached_end: collection.reached_end(),
            last_error: collection.last_error().cloned(),
        }
    }
}

impl From<&DetailSession> for SelectionSnapshot {
    fn from(session: &DetailSession) -> Self {
        SelectionSnapshot {
            selected_id: session.selected_id(),
            detail: session.current_detail().cloned(),
            fetch_token: session.fetch_token(),
            pending: session.is_pending(),
            last_error: session.last_error().cloned(),
        }
    }
}

impl Snapshot {
    pub fn capture(collection: &PaginatedCollection, session: &DetailSession) -> Self {
        Snapshot {
            collection: collection.into(),
            selection: session.into(),
        }
    }
}
