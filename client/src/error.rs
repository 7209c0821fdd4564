//! Error types for the sync client.

use thiserror::Error;

/// Errors surfaced by the local store, transport and sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The server could not be reached or answered with an unexpected status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Reading or writing the local state file failed.
    #[error("local store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] ptsync_engine::Error),
}

impl SyncError {
    /// Whether retrying later could succeed without user action.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            SyncError::Unauthorized
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
