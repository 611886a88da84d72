use std::sync::Arc;

use corelib::models::swap_models::SwapQuote;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::QuoteStreamError;

/// Coherent view of the three store cells.
///
/// At most one of `confirmation` and `error` is fresh at any observable
/// point; opening a new subscription clears both before the first event.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    pub confirmation: Option<SwapQuote>,
    pub is_fetching: bool,
    pub error: Option<QuoteStreamError>,
}

struct StoreInner {
    snapshot: QuoteSnapshot,
    listeners: Vec<mpsc::UnboundedSender<QuoteSnapshot>>,
}

/// Multi-reader quote store written only through the subscription manager.
///
/// Every write mutates all affected cells under one lock and then fans the
/// resulting snapshot out to listeners, so readers never observe a torn
/// update. Each cell holds only its latest value; a held quote is not
/// invalidated by the passage of time.
pub struct QuoteStore {
    inner: Mutex<StoreInner>,
}

impl QuoteStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StoreInner {
                snapshot: QuoteSnapshot::default(),
                listeners: Vec::new(),
            }),
        })
    }

    /// Synchronous coherent read of all three cells.
    pub fn snapshot(&self) -> QuoteSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Register a listener. It receives one coherent snapshot per store
    /// update, starting with the next write.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<QuoteSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().listeners.push(tx);
        rx
    }

    /// Apply one mutation and notify listeners. Dropped receivers are
    /// pruned on the way.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut QuoteSnapshot)) {
        let mut inner = self.inner.lock();
        mutate(&mut inner.snapshot);
        let snapshot = inner.snapshot.clone();
        inner
            .listeners
            .retain(|listener| listener.send(snapshot.clone()).is_ok());
    }

    /// Enter the fetching state for a new subscription: both outcome cells
    /// are cleared before the first event can arrive.
    pub(crate) fn begin_fetch(&self) {
        self.update(|snapshot| {
            snapshot.confirmation = None;
            snapshot.error = None;
            snapshot.is_fetching = true;
        });
    }

    /// Return to the idle state (incomplete input).
    pub(crate) fn reset(&self) {
        self.update(|snapshot| *snapshot = QuoteSnapshot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_see_post_update_snapshots() {
        let store = QuoteStore::new();
        let mut updates = store.subscribe();

        store.begin_fetch();
        store.update(|snapshot| {
            snapshot.is_fetching = false;
            snapshot.error = Some(QuoteStreamError::ConnectionClosed);
        });

        let first = updates.try_recv().unwrap();
        assert!(first.is_fetching);
        assert!(first.error.is_none());

        let second = updates.try_recv().unwrap();
        assert!(!second.is_fetching);
        assert_eq!(second.error, Some(QuoteStreamError::ConnectionClosed));

        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn reset_returns_to_idle() {
        let store = QuoteStore::new();
        store.begin_fetch();
        store.reset();

        let snapshot = store.snapshot();
        assert!(snapshot.confirmation.is_none());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.is_fetching);
    }

    #[test]
    fn dropped_listeners_are_pruned() {
        let store = QuoteStore::new();
        let updates = store.subscribe();
        drop(updates);

        // Must not fail or leak the dead sender.
        store.begin_fetch();
        assert_eq!(store.inner.lock().listeners.len(), 0);
    }
}
