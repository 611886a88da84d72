use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::params::QuoteRequest;
use crate::store::{QuoteSnapshot, QuoteStore};

pub type SessionId = Uuid;

/// Lifecycle of one logical push connection.
///
/// `Streaming` and `Errored` are both live: a service error does not close
/// the connection and the next valid quote recovers. `Closed` is terminal;
/// a new subscription is a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connecting,
    Streaming,
    Errored,
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Connecting => "Connecting",
            SessionStatus::Streaming => "Streaming",
            SessionStatus::Errored => "Errored",
            SessionStatus::Closed => "Closed",
        };
        f.write_str(s)
    }
}

/// One exclusively-owned subscription session.
///
/// The status mutex doubles as the store write gate: `apply` performs its
/// store write while holding it and `close` flips the status under the same
/// lock. Once `close` returns, no write from this session can reach the
/// store, regardless of how its background tasks wind down.
pub struct StreamSession {
    id: SessionId,
    request: QuoteRequest,
    status: Mutex<SessionStatus>,
    store: Arc<QuoteStore>,
}

impl StreamSession {
    pub(crate) fn new(request: QuoteRequest, store: Arc<QuoteStore>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            request,
            status: Mutex::new(SessionStatus::Connecting),
            store,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The parameters this session was opened with.
    pub fn request(&self) -> &QuoteRequest {
        &self.request
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.lock()
    }

    pub fn is_closed(&self) -> bool {
        self.status() == SessionStatus::Closed
    }

    /// Gated store write plus status transition.
    ///
    /// Returns false without touching the store when the session is already
    /// closed.
    pub(crate) fn apply(
        &self,
        next: SessionStatus,
        mutate: impl FnOnce(&mut QuoteSnapshot),
    ) -> bool {
        let mut status = self.status.lock();
        if *status == SessionStatus::Closed {
            return false;
        }
        *status = next;
        self.store.update(mutate);
        true
    }

    /// Shut the write gate. Idempotent and safe on a closed session.
    pub(crate) fn close(&self) {
        *self.status.lock() = SessionStatus::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            from_asset: "ton".into(),
            to_asset: "EQJetton".into(),
            from_amount: "1000000000".into(),
            user_address: "UQWallet".into(),
        }
    }

    #[test]
    fn apply_transitions_and_writes() {
        let store = QuoteStore::new();
        let session = StreamSession::new(request(), Arc::clone(&store));
        assert_eq!(session.status(), SessionStatus::Connecting);

        let wrote = session.apply(SessionStatus::Streaming, |s| s.is_fetching = true);
        assert!(wrote);
        assert_eq!(session.status(), SessionStatus::Streaming);
        assert!(store.snapshot().is_fetching);
    }

    #[test]
    fn closed_session_never_writes() {
        let store = QuoteStore::new();
        let session = StreamSession::new(request(), Arc::clone(&store));

        session.close();
        session.close(); // idempotent

        let wrote = session.apply(SessionStatus::Streaming, |s| s.is_fetching = true);
        assert!(!wrote);
        assert!(!store.snapshot().is_fetching);
        assert!(session.is_closed());
    }
}
