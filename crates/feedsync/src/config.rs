//! Configuration for the engine.

use std::time::Duration;

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on each remote call. `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
    /// Whether [`SyncEngine::start`](crate::SyncEngine::start) loads the feed.
    pub load_on_start: bool,
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            call_timeout: None,
            load_on_start: true,
        }
    }

    /// Sets the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Sets whether the feed is loaded at startup.
    pub fn with_load_on_start(mut self, load: bool) -> Self {
        self.load_on_start = load;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
