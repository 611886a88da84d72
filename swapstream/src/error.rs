use thiserror::Error;

/// Operational failures of the HTTP and push-stream clients.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcome held in the `error` cell of the quote store.
///
/// Application errors, transport closure and undecodable events all land in
/// the same slot; consumers treat whatever is present as "route unavailable"
/// and must not rely on a finer distinction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteStreamError {
    /// The aggregation service reported an error payload (e.g. `no_route`).
    #[error("{0}")]
    Service(String),

    /// The push connection dropped without an application-level error.
    #[error("quote stream connection closed")]
    ConnectionClosed,

    /// An inbound event could not be decoded.
    #[error("failed to parse stream event: {0}")]
    Parse(String),
}
