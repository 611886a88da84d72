use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::sync::mpsc::Sender;
use tracing::{debug, instrument, warn};

use super::QuoteStreamApi;
use crate::error::StreamError;
use crate::params::QuoteRequest;

/// Server-push client for the quote-aggregation stream.
///
/// One long-lived GET per subscription; the body is an event stream with one
/// JSON payload per `data:` line. There is no automatic reconnection — a
/// dropped connection surfaces to the session as a connection-closed outcome.
pub struct SseQuoteStream {
    http: Client,
    base_url: String,
}

impl SseQuoteStream {
    pub fn new(base_url: String) -> Result<Self, StreamError> {
        // Connect timeout only: the stream itself stays open until the
        // session is closed.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl QuoteStreamApi for SseQuoteStream {
    #[instrument(
        skip(self, events),
        fields(from = %request.from_asset, to = %request.to_asset)
    )]
    async fn open_stream(
        &self,
        request: QuoteRequest,
        events: Sender<String>,
    ) -> Result<(), StreamError> {
        let url = format!("{}/v2/swap/omniston/stream", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("fromAsset", request.from_asset.as_str()),
                ("toAsset", request.to_asset.as_str()),
                ("fromAmount", request.from_amount.as_str()),
                ("userAddress", request.user_address.as_str()),
            ])
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        debug!("quote stream connected");

        let mut body = resp.bytes_stream();
        let mut buf = String::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            buf.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buf.find('\n') {
                let line: String = buf.drain(..=pos).collect();
                let line = line.trim_end_matches(['\n', '\r']);

                // One JSON payload per `data:` line; blank keep-alive lines
                // and comment lines carry nothing.
                let Some(payload) = line.strip_prefix("data:") else {
                    continue;
                };
                let payload = payload.trim_start();
                if payload.is_empty() {
                    continue;
                }

                if events.send(payload.to_string()).await.is_err() {
                    // Receiver gone: the session was superseded or closed.
                    debug!("event receiver dropped, terminating stream");
                    return Ok(());
                }
            }
        }

        warn!("quote stream disconnected");
        Ok(())
    }
}
