//! Network seam between the sync engine and the server.

use crate::error::{Result, SyncError};
use async_trait::async_trait;
use ptsync_engine::{BootstrapSnapshot, PushRequest, PushResponse};
use std::time::Duration;

/// The two calls the sync protocol needs from the server.
#[async_trait]
pub trait SyncTransport: Send + Sync + 'static {
    /// Fetch the authoritative snapshot for the current user.
    async fn pull(&self) -> Result<BootstrapSnapshot>;

    /// Send a batch of mutations and get a per-id outcome back.
    async fn push(&self, request: &PushRequest) -> Result<PushResponse>;
}

/// [`SyncTransport`] over HTTP with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn pull(&self) -> Result<BootstrapSnapshot> {
        let snapshot = self
            .client
            .get(self.url("/sync/bootstrap"))
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(|r| r.error_for_status())?
            .json::<BootstrapSnapshot>()
            .await?;
        Ok(snapshot)
    }

    async fn push(&self, request: &PushRequest) -> Result<PushResponse> {
        let response = self
            .client
            .post(self.url("/sync/push"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .and_then(|r| r.error_for_status())?
            .json::<PushResponse>()
            .await?;
        Ok(response)
    }
}
