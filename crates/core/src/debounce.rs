//! Keystroke coalescing for a single search box.
//!
//! Every [`Debouncer::input`] gets a sequence number. Only the newest one is
//! allowed to deliver an outcome, so a slow search that finishes after the
//! user kept typing is discarded instead of overwriting fresher results.

use crate::client::SearchClient;
use crate::traits::SearchTransport;
use crate::SearchOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct DebouncedOutcome {
    pub sequence: u64,
    pub query: String,
    pub outcome: SearchOutcome,
}

pub struct DebouncedResults {
    receiver: mpsc::UnboundedReceiver<DebouncedOutcome>,
}

impl DebouncedResults {
    /// Resolves to `None` once the debouncer and all its in-flight searches
    /// are gone.
    pub async fn recv(&mut self) -> Option<DebouncedOutcome> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<DebouncedOutcome> {
        self.receiver.try_recv().ok()
    }
}

pub struct Debouncer<T> {
    client: Arc<SearchClient<T>>,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    sender: mpsc::UnboundedSender<DebouncedOutcome>,
    closed: bool,
}

impl<T> Debouncer<T> {
    pub fn latest_sequence(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Cancels the pending timer and invalidates in-flight searches. Later
    /// calls to `input` are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel_pending();
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn next_sequence(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn deliver(&self, sequence: u64, query: &str, outcome: SearchOutcome) {
        // The receiver may already be gone; nothing to do then.
        let _ = self.sender.send(DebouncedOutcome {
            sequence,
            query: query.to_string(),
            outcome,
        });
    }
}

impl<T> Debouncer<T>
where
    T: SearchTransport + Send + Sync + 'static,
{
    pub fn new(client: Arc<SearchClient<T>>, delay: Duration) -> (Self, DebouncedResults) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            client,
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            sender,
            closed: false,
        };
        (debouncer, DebouncedResults { receiver })
    }

    /// Records the latest text of the search box and returns its sequence
    /// number. Must be called from within a tokio runtime.
    pub fn input(&mut self, query: &str) -> u64 {
        if self.closed {
            return self.latest_sequence();
        }

        self.cancel_pending();
        let sequence = self.next_sequence();

        if let Some(outcome) = self.client.canned(query) {
            self.deliver(sequence, query, outcome);
            return sequence;
        }

        if !self.client.is_dispatchable(query) {
            self.deliver(sequence, query, SearchOutcome::too_short());
            return sequence;
        }

        let client = Arc::clone(&self.client);
        let latest = Arc::clone(&self.latest);
        let sender = self.sender.clone();
        let delay = self.delay;
        let query = query.to_string();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != sequence {
                return;
            }

            // Detached so that a newer keystroke only cancels timers, never a
            // request that is already on the wire.
            tokio::spawn(async move {
                let outcome = client.search_detailed(&query).await;
                if latest.load(Ordering::SeqCst) != sequence {
                    debug!(sequence, query = %query, "discarding stale search outcome");
                    return;
                }
                let _ = sender.send(DebouncedOutcome {
                    sequence,
                    query,
                    outcome,
                });
            });
        }));

        sequence
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.close();
    }
}
