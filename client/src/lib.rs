//! # ptsync Client
//!
//! Device-side sync for ptsync. Students record workouts while offline; this
//! crate keeps those records in a durable queue and delivers them to the
//! server when a connection is available, then refreshes the local cache of
//! assigned plans and history.
//!
//! The pieces are wired together explicitly:
//!
//! ```rust,no_run
//! use ptsync_client::{Connectivity, HttpTransport, LocalStore, SyncConfig, SyncEngine};
//! use std::time::Duration;
//!
//! # async fn run() -> ptsync_client::Result<()> {
//! let store = LocalStore::open("/data/ptsync/state.json").await?;
//! let transport = HttpTransport::new("https://api.example.com", "token", Duration::from_secs(15))?;
//! let connectivity = Connectivity::new(true);
//!
//! let engine = SyncEngine::new(store, transport, connectivity.clone(), SyncConfig::default());
//! engine.spawn_connectivity_listener();
//! engine.sync_now().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod events;
pub mod store;
pub mod transport;

pub use config::SyncConfig;
pub use connectivity::Connectivity;
pub use engine::{BootstrapOutcome, FlushReport, SyncEngine, SyncReport};
pub use error::{Result, SyncError};
pub use events::{EventBus, SyncEvent};
pub use store::LocalStore;
pub use transport::{HttpTransport, SyncTransport};
