//! Fire-and-forget notifications for the page-load path.
//!
//! The coordinator tells a [`Notifier`] when a page fetch starts and when it
//! completes. Notifier failures are logged and otherwise ignored; nothing in
//! the collection depends on them.

use log::{debug, info};
use postfeed_core::FetchError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FetchNotice {
    Started { page_number: u32 },
    Completed { page_number: u32, appended: usize },
    Failed { page_number: u32, error: FetchError },
}

impl FetchNotice {
    pub fn title(&self) -> &'static str {
        match self {
            FetchNotice::Started { .. } => "FETCHING DATA",
            FetchNotice::Completed { .. } => "FETCHING DATA COMPLETE",
            FetchNotice::Failed { .. } => "FETCHING DATA FAILED",
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receives page-load notices. Must not block: it is called on the
/// coordinator's own timeline.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &FetchNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &FetchNotice) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes every notice to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &FetchNotice) -> Result<(), NotifyError> {
        match notice {
            FetchNotice::Started { page_number } => {
                info!("{} (page {page_number})", notice.title())
            }
            FetchNotice::Completed {
                page_number,
                appended,
            } => info!("{} (page {page_number}, {appended} new)", notice.title()),
            FetchNotice::Failed { page_number, error } => {
                info!("{} (page {page_number}): {error}", notice.title())
            }
        }
        Ok(())
    }
}

pub(crate) fn dispatch(notifier: &dyn Notifier, notice: FetchNotice) {
    if let Err(err) = notifier.notify(&notice) {
        debug!("Ignoring notifier error for {:?}: {err}", notice.title());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _notice: &FetchNotice) -> Result<(), NotifyError> {
            Err(NotifyError("no permission".to_string()))
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            FetchNotice::Started { page_number: 1 }.title(),
            "FETCHING DATA"
        );
        assert_eq!(
            FetchNotice::Completed {
                page_number: 1,
                appended: 3
            }
            .title(),
            "FETCHING DATA COMPLETE"
        );
    }

    #[test]
    fn test_dispatch_swallows_errors() {
        dispatch(&FailingNotifier, FetchNotice::Started { page_number: 1 });
        dispatch(&NoopNotifier, FetchNotice::Started { page_number: 1 });
        dispatch(
            &LogNotifier,
            FetchNotice::Failed {
                page_number: 2,
                error: FetchError::Network("down".to_string()),
            },
        );
    }
}
