//! Serialized command/completion loop owning all mutable feed state.
//!
//! A `Coordinator` is a handle to a tokio task that owns the
//! [`PaginatedCollection`] and the [`DetailSession`]. Commands from the UI and
//! fetch completions travel through the same unbounded channel, so state is
//! only ever mutated on that task, one message at a time.
//!
//! Fetches run as their own tasks. When one finishes it re-enters the channel
//! as a completion message carrying the ticket it was issued with; the state
//! machines drop completions whose ticket is no longer current. Those tasks
//! only hold a weak sender, so dropping the last `Coordinator` handle stops
//! the loop even while fetches are outstanding.

use crate::prelude::*;
use log::{debug, info};
use postfeed_core::collection::{PageOutcome, PageTicket, PaginatedCollection};
use postfeed_core::detail::{DetailSession, DetailTicket};
use postfeed_core::snapshot::Snapshot;
use postfeed_core::transform::{DerivedValue, TransformCache};
use postfeed_core::{FetchError, Record, RecordId};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::FeedConfig;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::notify::{dispatch, FetchNotice, Notifier};

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub page_size: NonZeroU32,
    /// Issue the first page load as soon as the coordinator starts.
    pub load_on_start: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        CoordinatorOptions {
            page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            load_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    LoadNextPage,
    Refresh,
    Select(RecordId),
    Deselect,
}

enum Message {
    Command {
        command: Command,
        reply: oneshot::Sender<Snapshot>,
    },
    PageLoaded {
        ticket: PageTicket,
        result: Result<Vec<Record>, FetchError>,
    },
    DetailLoaded {
        ticket: DetailTicket,
        result: Result<Record, FetchError>,
    },
}

pub struct Coordinator {
    inbox: mpsc::UnboundedSender<Message>,
    snapshots: watch::Receiver<Snapshot>,
    transforms: Arc<TransformCache>,
    task: JoinHandle<()>,
}

impl Coordinator {
    /// Start the coordinator loop. Must be called from within a tokio runtime.
    pub fn spawn(
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        options: CoordinatorOptions,
    ) -> Self {
        Self::spawn_with_transforms(
            fetcher,
            notifier,
            options,
            Arc::new(TransformCache::default()),
        )
    }

    pub fn spawn_with_transforms(
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        options: CoordinatorOptions,
        transforms: Arc<TransformCache>,
    ) -> Self {
        let (inbox, receiver) = mpsc::unbounded_channel();
        let collection = PaginatedCollection::new(options.page_size);
        let session = DetailSession::new();
        let (publisher, snapshots) = watch::channel(Snapshot::capture(&collection, &session));

        let mut worker = Worker {
            collection,
            session,
            fetcher,
            notifier,
            completions: inbox.downgrade(),
            publisher,
        };

        if options.load_on_start {
            worker.apply(Command::LoadNextPage);
        }

        let task = tokio::spawn(worker.run(receiver));

        Coordinator {
            inbox,
            snapshots,
            transforms,
            task,
        }
    }

    /// Start a coordinator backed by [`HttpFetcher`] using `config`.
    pub fn from_config(config: &FeedConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        let options = config.coordinator_options()?;

        info!(
            "Starting coordinator for {} (page size {})",
            fetcher.endpoint().base_url(),
            options.page_size
        );

        Ok(Self::spawn(Arc::new(fetcher), notifier, options))
    }

    pub async fn load_next_page(&self) -> Result<Snapshot> {
        self.send(Command::LoadNextPage).await
    }

    pub async fn refresh(&self) -> Result<Snapshot> {
        self.send(Command::Refresh).await
    }

    pub async fn select(&self, id: RecordId) -> Result<Snapshot> {
        self.send(Command::Select(id)).await
    }

    pub async fn deselect(&self) -> Result<Snapshot> {
        self.send(Command::Deselect).await
    }

    /// Queue `command` and wait for the snapshot it produced.
    pub async fn send(&self, command: Command) -> Result<Snapshot> {
        let (reply, response) = oneshot::channel();

        self.inbox
            .send(Message::Command { command, reply })
            .map_err(|_| Error::CoordinatorClosed)?;

        Ok(response.await.map_err(|_| Error::CoordinatorClosed)?)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn transforms(&self) -> Arc<TransformCache> {
        Arc::clone(&self.transforms)
    }

    /// Derived values for the records of `snapshot`, computed at most once per record.
    pub fn derived(&self, snapshot: &Snapshot) -> Vec<Arc<DerivedValue>> {
        self.transforms.get_all(&snapshot.collection.records)
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// Fetches still in flight finish on their own and their results are dropped.
    pub async fn shutdown(self) -> Result<()> {
        let Coordinator { inbox, task, .. } = self;
        drop(inbox);

        task.await.context("Coordinator task failed")?;
        Ok(())
    }
}

struct Worker {
    collection: PaginatedCollection,
    session: DetailSession,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    completions: mpsc::WeakUnboundedSender<Message>,
    publisher: watch::Sender<Snapshot>,
}

impl Worker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = receiver.recv().await {
            self.handle(message);
        }

        debug!("Coordinator stopped");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Command { command, reply } => {
                let snapshot = self.apply(command);
                // The caller may have stopped waiting; the snapshot is still published.
                let _ = reply.send(snapshot);
            }
            Message::PageLoaded { ticket, result } => self.page_loaded(ticket, result),
            Message::DetailLoaded { ticket, result } => self.detail_loaded(ticket, result),
        }
    }

    fn apply(&mut self, command: Command) -> Snapshot {
        debug!("Applying {command:?}");

        match command {
            Command::LoadNextPage => {
                if let Some(ticket) = self.collection.load_next_page() {
                    self.start_page(ticket);
                }
            }
            Command::Refresh => {
                let ticket = self.collection.refresh();
                self.start_page(ticket);
            }
            Command::Select(id) => {
                let ticket = self.session.select(id);
                self.start_detail(ticket);
            }
            Command::Deselect => self.session.deselect(),
        }

        self.publish()
    }

    fn start_page(&self, ticket: PageTicket) {
        dispatch(
            self.notifier.as_ref(),
            FetchNotice::Started {
                page_number: ticket.request.page_number(),
            },
        );

        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_page(ticket.request).await;
            deliver(&completions, Message::PageLoaded { ticket, result });
        });
    }

    fn start_detail(&self, ticket: DetailTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_record(ticket.id).await;
            deliver(&completions, Message::DetailLoaded { ticket, result });
        });
    }

    fn page_loaded(&mut self, ticket: PageTicket, result: Result<Vec<Record>, FetchError>) {
        let notice = match self.collection.complete(ticket, result) {
            Ok(PageOutcome::Merged(outcome)) => FetchNotice::Completed {
                page_number: outcome.page_number,
                appended: outcome.appended,
            },
            Ok(PageOutcome::Failed(error)) => FetchNotice::Failed {
                page_number: ticket.request.page_number(),
                error,
            },
            Err(stale) => {
                debug!("Discarding page {}: {stale}", ticket.request.page_number());
                return;
            }
        };

        dispatch(self.notifier.as_ref(), notice);
        self.publish();
    }

    fn detail_loaded(&mut self, ticket: DetailTicket, result: Result<Record, FetchError>) {
        if self.session.complete(ticket, result).is_ok() {
            self.publish();
        }
    }

    fn publish(&self) -> Snapshot {
        let snapshot = Snapshot::capture(&self.collection, &self.session);
        self.publisher.send_replace(snapshot.clone());
        snapshot
    }
}

fn deliver(completions: &mpsc::WeakUnboundedSender<Message>, message: Message) {
    let delivered = completions
        .upgrade()
        .is_some_and(|inbox| inbox.send(message).is_ok());

    if !delivered {
        debug!("Coordinator gone, dropping completion");
    }
}
