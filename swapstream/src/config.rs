use std::time::Duration;

/// Runtime configuration of the streaming client.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Base URL of the quote-aggregation service.
    ///
    /// An empty value means swaps are disabled for the active environment;
    /// callers must not open subscriptions in that case.
    pub base_url: String,

    /// Quiet period between the last observed form change and the
    /// resubscription it triggers.
    pub debounce: Duration,

    /// Capacity of the channel between the transport and the event pump.
    ///
    /// Inbound events are small and each one supersedes the previous store
    /// value, so a modest buffer is enough.
    pub event_channel_capacity: usize,
}

impl StreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Swaps are available only when a stream endpoint is configured.
    pub fn is_swaps_enabled(&self) -> bool {
        !self.base_url.is_empty()
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            debounce: Duration::from_millis(300),
            event_channel_capacity: 50,
        }
    }
}
