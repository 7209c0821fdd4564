//! Online/offline state shared between the platform and the sync engine.

use tokio::sync::watch;

/// Handle reporting whether the device is online.
///
/// Clones share the same state. The platform layer calls [`set_online`]
/// when its network callback fires; the engine reads the current value and
/// listens for transitions.
///
/// [`set_online`]: Connectivity::set_online
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _) = watch::channel(online);
        Self { tx }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the state. Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
