//! Single-selection detail session
//!
//! Every `select` and `deselect` bumps the fetch token. A detail fetch carries
//! the token it was issued with, and its completion is applied only while that
//! token is still current, so a slow response for an earlier selection can
//! never overwrite a later one.

use log::{debug, warn};
use serde::Serialize;

use crate::error::{FetchError, StaleResult};
use crate::record::{Record, RecordId};

/// Identifies one issued detail fetch.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub token: u64,
    pub id: RecordId,
}

#[derive(Debug, Default)]
pub struct DetailSession {
    selected_id: Option<RecordId>,
    detail: Option<Record>,
    fetch_token: u64,
    pending: bool,
    last_error: Option<FetchError>,
}

impl DetailSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` and describe the fetch to run for it.
    ///
    /// Re-selecting the current id issues a fresh fetch as well.
    pub fn select(&mut self, id: RecordId) -> DetailTicket {
        self.fetch_token += 1;
        self.selected_id = Some(id);
        self.detail = None;
        self.last_error = None;
        self.pending = true;

        DetailTicket {
            token: self.fetch_token,
            id,
        }
    }

    pub fn deselect(&mut self) {
        self.fetch_token += 1;
        self.selected_id = None;
        self.detail = None;
        self.last_error = None;
        self.pending = false;
    }

    /// Apply the outcome of the fetch described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: DetailTicket,
        result: Result<Record, FetchError>,
    ) -> Result<(), StaleResult> {
        if ticket.token != self.fetch_token {
            debug!(
                "Dropping detail for record {} (token {} superseded by {})",
                ticket.id, ticket.token, self.fetch_token
            );
            return Err(StaleResult {
                issued: ticket.token,
                current: self.fetch_token,
            });
        }

        self.pending = false;
        match result {
            Ok(record) => self.detail = Some(record),
            Err(err) => {
                warn!("Detail fetch for record {} failed: {err}", ticket.id);
                self.last_error = Some(err);
            }
        }

        Ok(())
    }

    pub fn current_detail(&self) -> Option<&Record> {
        self.detail.as_ref()
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected_id
    }

    pub fn fetch_token(&self) -> u64 {
        self.fetch_token
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RecordId) -> Record {
        Record {
            id,
            title: format!("title {id}"),
            body: format!("body {id}"),
        }
    }

    #[test]
    fn test_select_clears_detail_and_bumps_token() {
        let mut session = DetailSession::new();
        let first = session.select(1);
        session.complete(first, Ok(record(1))).unwrap();

        let second = session.select(2);

        assert_eq!(second.token, first.token + 1);
        assert_eq!(session.selected_id(), Some(2));
        assert!(session.current_detail().is_none());
        assert!(session.is_pending());
    }

    #[test]
    fn test_complete_applies_current_token() {
        let mut session = DetailSession::new();
        let ticket = session.select(7);

        session.complete(ticket, Ok(record(7))).unwrap();

        assert_eq!(session.current_detail(), Some(&record(7)));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_superseded_selection_is_dropped() {
        let mut session = DetailSession::new();
        let first = session.select(1);
        let second = session.select(2);

        let stale = session.complete(first, Ok(record(1)));

        assert_eq!(
            stale,
            Err(StaleResult {
                issued: first.token,
                current: second.token
            })
        );
        assert!(session.current_detail().is_none());
        assert!(session.is_pending());

        session.complete(second, Ok(record(2))).unwrap();
        assert_eq!(session.current_detail().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_late_first_result_after_second_is_dropped() {
        let mut session = DetailSession::new();
        let first = session.select(1);
        let second = session.select(2);

        session.complete(second, Ok(record(2))).unwrap();
        assert!(session.complete(first, Ok(record(1))).is_err());

        assert_eq!(session.current_detail().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_deselect_discards_in_flight_fetch() {
        let mut session = DetailSession::new();
        let ticket = session.select(3);

        session.deselect();
        let stale = session.complete(ticket, Ok(record(3)));

        assert!(stale.is_err());
        assert_eq!(session.selected_id(), None);
        assert!(session.current_detail().is_none());
        assert!(!session.is_pending());
    }

    #[test]
    fn test_failure_records_error_and_keeps_detail_empty() {
        let mut session = DetailSession::new();
        let ticket = session.select(4);

        session
            .complete(ticket, Err(FetchError::Network("timeout".to_string())))
            .unwrap();

        assert!(session.current_detail().is_none());
        assert_eq!(
            session.last_error(),
            Some(&FetchError::Network("timeout".to_string()))
        );
        assert_eq!(session.selected_id(), Some(4));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_reselect_same_id_issues_new_token() {
        let mut session = DetailSession::new();
        let first = session.select(5);
        let again = session.select(5);

        assert_ne!(first.token, again.token);
        assert!(session.complete(first, Ok(record(5))).is_err());
        assert!(session.complete(again, Ok(record(5))).is_ok());
    }

    #[test]
    fn test_new_selection_clears_previous_error() {
        let mut session = DetailSession::new();
        let ticket = session.select(1);
        session
            .complete(ticket, Err(FetchError::Decode("bad".to_string())))
            .unwrap();

        session.select(2);

        assert!(session.last_error().is_none());
    }
}
