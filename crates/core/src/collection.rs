//! Paginated, de-duplicated record collection
//!
//! `PaginatedCollection` is a state machine over `Idle`, `Fetching` and `Error`.
//! It never performs I/O: `load_next_page` and `refresh` hand out a
//! [`PageTicket`] describing the fetch to run, and the caller reports the
//! outcome back through [`PaginatedCollection::complete`].
//!
//! Two counters keep completions honest:
//!
//! - the **generation** is bumped by every refresh, so a page fetched before a
//!   refresh can never be merged into the post-refresh records;
//! - the **in-flight ticket** enforces single-flight: while one page of the
//!   current generation is outstanding, further loads are ignored, not queued.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::num::NonZeroU32;

use crate::error::{FetchError, StaleResult};
use crate::record::{PageRequest, Record, RecordId};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Error,
}

/// Identifies one issued page fetch.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub page_number: u32,
    /// Records in the response.
    pub received: usize,
    /// Records actually appended after de-duplication.
    pub appended: usize,
}

/// What applying a current (non-stale) completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Merged(MergeOutcome),
    Failed(FetchError),
}

#[derive(Debug)]
pub struct PaginatedCollection {
    records: Vec<Record>,
    seen: HashSet<RecordId>,
    current_page: u32,
    page_size: NonZeroU32,
    generation: u64,
    in_flight: Option<PageTicket>,
    last_error: Option<FetchError>,
    reached_end: bool,
}

impl PaginatedCollection {
    pub fn new(page_size: NonZeroU32) -> Self {
        PaginatedCollection {
            records: Vec::new(),
            seen: HashSet::new(),
            current_page: 0,
            page_size,
            generation: 0,
            in_flight: None,
            last_error: None,
            reached_end: false,
        }
    }

    /// Start fetching the page after `current_page`.
    ///
    /// Returns `None` when a page of the current generation is already in
    /// flight. Clears a previous error so the same page can be retried.
    pub fn load_next_page(&mut self) -> Option<PageTicket> {
        if let Some(pending) = self.in_flight {
            debug!(
                "Page {} (generation {}) already in flight, ignoring load",
                pending.request.page_number(),
                pending.generation
            );
            return None;
        }

        self.last_error = None;
        Some(self.issue())
    }

    /// Drop every accumulated record and start again from page 1.
    ///
    /// Whatever was in flight becomes stale: its completion will be rejected
    /// because the generation no longer matches.
    pub fn refresh(&mut self) -> PageTicket {
        self.generation += 1;
        self.records.clear();
        self.seen.clear();
        self.current_page = 0;
        self.last_error = None;
        self.reached_end = false;

        if let Some(stale) = self.in_flight.take() {
            debug!(
                "Refresh supersedes page {} of generation {}",
                stale.request.page_number(),
                stale.generation
            );
        }

        info!("Refreshing collection (generation {})", self.generation);
        self.issue()
    }

    /// Apply the outcome of the fetch described by `ticket`.
    ///
    /// Returns `Err(StaleResult)` without touching any state when `ticket` is
    /// not the fetch currently in flight.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<Record>, FetchError>,
    ) -> Result<PageOutcome, StaleResult> {
        if self.in_flight != Some(ticket) {
            return Err(StaleResult {
                issued: ticket.generation,
                current: self.generation,
            });
        }
        self.in_flight = None;

        match result {
            Ok(fetched) => Ok(PageOutcome::Merged(self.merge(ticket.request, fetched))),
            Err(err) => {
                warn!("Page {} failed: {err}", ticket.request.page_number());
                self.last_error = Some(err.clone());
                Ok(PageOutcome::Failed(err))
            }
        }
    }

    fn issue(&mut self) -> PageTicket {
        let request = PageRequest::numbered(self.current_page.saturating_add(1), self.page_size);
        let ticket = PageTicket {
            generation: self.generation,
            request,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    fn merge(&mut self, request: PageRequest, fetched: Vec<Record>) -> MergeOutcome {
        let received = fetched.len();
        let before = self.records.len();

        for record in fetched {
            if self.seen.insert(record.id) {
                self.records.push(record);
            }
        }

        let appended = self.records.len() - before;
        if appended < received {
            debug!(
                "Dropped {} duplicate records from page {}",
                received - appended,
                request.page_number()
            );
        }

        self.current_page = request.page_number();
        self.reached_end = received == 0;

        info!(
            "Merged page {} ({appended} new, {} total)",
            request.page_number(),
            self.records.len()
        );

        MergeOutcome {
            page_number: request.page_number(),
            received,
            appended,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Fetching
        } else if self.last_error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.seen.contains(&id)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<PageTicket> {
        self.in_flight
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Whether the last successful page came back empty.
    pub fn reached_end(&self) -> bool {
        self.reached_end
    }
}
