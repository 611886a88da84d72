//! SubscriptionManager
//!
//! Owns the single live quote subscription. Responsibilities:
//!   • tear down the previous session fully before a new one may listen
//!   • put the store into the fetching state before the first event
//!   • normalize inbound events into gated store writes
//!
//! Supersession ordering matters more than transport teardown timing: the
//! old session's write gate is shut synchronously inside `open`, so a late
//! network message from session N can never be attributed to session N+1.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::QuoteStreamError;
use crate::event::{StreamEvent, parse_stream_event};
use crate::params::QuoteRequest;
use crate::session::{SessionId, SessionStatus, StreamSession};
use crate::store::QuoteStore;
use crate::transport::QuoteStreamApi;

/// Handle to the active session and its background tasks.
pub struct SessionHandle {
    session: Arc<StreamSession>,
    transport_task: JoinHandle<()>,
    pump_task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.session.id()
    }

    pub fn session(&self) -> &Arc<StreamSession> {
        &self.session
    }

    /// Close the session: shut the write gate first (synchronous listener
    /// detachment), then tear down the pump and the transport. Idempotent.
    pub fn close(&self) {
        self.session.close();
        self.pump_task.abort();
        self.transport_task.abort();
    }
}

/// Owns at most one live push connection and writes its outcomes to the
/// quote store.
pub struct SubscriptionManager<C> {
    transport: Arc<C>,
    store: Arc<QuoteStore>,
    active: Mutex<Option<SessionHandle>>,
    event_channel_capacity: usize,
}

impl<C: QuoteStreamApi> SubscriptionManager<C> {
    pub fn new(
        transport: Arc<C>,
        store: Arc<QuoteStore>,
        event_channel_capacity: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            store,
            active: Mutex::new(None),
            event_channel_capacity,
        })
    }

    pub fn store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    /// The session currently holding the connection, if any.
    pub fn active_session(&self) -> Option<Arc<StreamSession>> {
        self.active.lock().as_ref().map(|h| Arc::clone(h.session()))
    }

    /// Open a new session for `request`, superseding any active one.
    ///
    /// The previous session is fully closed before the new transport starts
    /// listening, and the store enters the fetching state (both outcome
    /// cells cleared) before the first event can arrive.
    pub fn open(&self, request: QuoteRequest) -> SessionId {
        let mut active = self.active.lock();

        if let Some(previous) = active.take() {
            debug!(session_id = %previous.id(), "superseding active session");
            previous.close();
        }

        self.store.begin_fetch();

        let session = StreamSession::new(request.clone(), Arc::clone(&self.store));
        let id = session.id();
        debug!(session_id = %id, from = %request.from_asset, to = %request.to_asset, "opening quote session");

        let (tx, rx) = mpsc::channel(self.event_channel_capacity);

        let transport = Arc::clone(&self.transport);
        let transport_task = tokio::spawn(async move {
            if let Err(e) = transport.open_stream(request, tx).await {
                warn!(error = %e, "quote stream transport failed");
            }
        });

        let pump_session = Arc::clone(&session);
        let pump_task = tokio::spawn(async move {
            Self::pump(pump_session, rx).await;
        });

        *active = Some(SessionHandle {
            session,
            transport_task,
            pump_task,
        });

        id
    }

    /// Close the active session, if any. Safe to call repeatedly.
    pub fn close_active(&self) {
        if let Some(handle) = self.active.lock().take() {
            handle.close();
        }
    }

    /// Consume raw events until the channel closes, translating each into a
    /// gated store write.
    async fn pump(session: Arc<StreamSession>, mut events: mpsc::Receiver<String>) {
        while let Some(raw) = events.recv().await {
            match parse_stream_event(&raw) {
                Ok(StreamEvent::Connected) => {
                    debug!(session_id = %session.id(), "stream handshake");
                }
                Ok(StreamEvent::Quote(quote)) => {
                    session.apply(SessionStatus::Streaming, |snapshot| {
                        snapshot.confirmation = Some(*quote);
                        snapshot.error = None;
                        snapshot.is_fetching = false;
                    });
                }
                Ok(StreamEvent::ServiceError(message)) => {
                    session.apply(SessionStatus::Errored, |snapshot| {
                        snapshot.confirmation = None;
                        snapshot.error = Some(QuoteStreamError::Service(message));
                        snapshot.is_fetching = false;
                    });
                }
                Err(parse_error) => {
                    // The connection stays open; a later valid message
                    // recovers the store.
                    session.apply(SessionStatus::Errored, |snapshot| {
                        snapshot.confirmation = None;
                        snapshot.error = Some(parse_error);
                        snapshot.is_fetching = false;
                    });
                }
            }
        }

        // Channel closed: the transport ended without an explicit close.
        let wrote = session.apply(SessionStatus::Errored, |snapshot| {
            snapshot.confirmation = None;
            snapshot.error = Some(QuoteStreamError::ConnectionClosed);
            snapshot.is_fetching = false;
        });
        if wrote {
            warn!(session_id = %session.id(), "quote stream connection closed");
        }
    }
}
