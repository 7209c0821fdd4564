//! Sync engine configuration.

/// Tunables for a [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Failed pushes after which a mutation is dead-lettered. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Buffered events per subscriber before the slowest one starts lagging.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            event_capacity: 64,
        }
    }
}

impl SyncConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}
