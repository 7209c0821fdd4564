//! Sync lifecycle events.

use ptsync_engine::{BootstrapStats, MutationId};
use tokio::sync::broadcast;

/// Something the sync engine finished doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A push round trip completed
    FlushCompleted {
        processed: usize,
        failed: usize,
        remaining: usize,
    },

    /// A push could not be completed; the queue is unchanged
    FlushFailed { error: String },

    /// The local cache was replaced with a fresh server snapshot
    BootstrapCompleted { stats: BootstrapStats },

    /// A bootstrap could not be completed; the previous cache is kept
    BootstrapFailed { error: String },

    /// A mutation was withdrawn from automatic retry
    MutationDeadLettered { id: MutationId, attempts: u32 },
}

/// Broadcasts [`SyncEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}
