pub mod sse;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::error::StreamError;
use crate::params::QuoteRequest;

/// High-level abstraction over the server-push quote stream.
#[async_trait]
pub trait QuoteStreamApi: Send + Sync + 'static {
    /// Open one connection for `request` and deliver each inbound event
    /// payload through `events`.
    ///
    /// Returns only when the connection has ended — normally, because the
    /// receiver was dropped, or with an error. The caller interprets the
    /// return as "connection closed".
    async fn open_stream(
        &self,
        request: QuoteRequest,
        events: Sender<String>,
    ) -> Result<(), StreamError>;
}
