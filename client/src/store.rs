//! Durable local store.
//!
//! Wraps the engine [`Store`] behind an async mutex and persists it as a
//! single JSON document after every write. The document is written to a
//! sibling temp file and renamed into place, so a crash mid-write leaves the
//! previous state intact. If persisting fails the in-memory change is rolled
//! back, so memory never runs ahead of disk.

use crate::error::Result;
use ptsync_engine::{
    AckReport, Assignment, BootstrapSnapshot, BootstrapStats, Exercise, LocalSnapshot, Mutation,
    MutationId, PendingMutation, Plan, PushResponse, Store, Timestamp, WorkoutLog,
};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Persisted device state: cached server snapshot plus the mutation queue.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    inner: Mutex<Store>,
}

impl LocalStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// Older document formats are upgraded in memory; the upgraded form is
    /// written back on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let store = match tokio::fs::read_to_string(&path).await {
            Ok(json) => {
                let snapshot = LocalSnapshot::from_json(&json)?;
                let store = Store::import_state(snapshot)?;
                tracing::debug!(
                    path = %path.display(),
                    pending = store.pending_count(),
                    "Loaded local store"
                );
                store
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No local store yet, starting empty");
                Store::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            inner: Mutex::new(store),
        })
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Mutex::new(Store::new()),
        }
    }

    /// Location of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Append a mutation to the queue.
    pub async fn enqueue(&self, mutation: Mutation) -> Result<()> {
        self.write(|store| {
            store.enqueue(mutation);
            Ok(())
        })
        .await
    }

    /// Apply a push response to the queue.
    pub async fn acknowledge(
        &self,
        sent: &[MutationId],
        response: &PushResponse,
        now: Timestamp,
        max_attempts: Option<u32>,
    ) -> Result<AckReport> {
        self.write(|store| Ok(store.acknowledge(sent, response, now, max_attempts)))
            .await
    }

    /// Replace the cached snapshot in one write.
    pub async fn apply_bootstrap(&self, snapshot: &BootstrapSnapshot) -> Result<BootstrapStats> {
        self.write(|store| Ok(store.apply_bootstrap(snapshot))).await
    }

    /// Move a dead letter back into the queue.
    pub async fn requeue_dead_letter(&self, id: &str) -> Result<()> {
        self.write(|store| Ok(store.requeue_dead_letter(id)?)).await
    }

    async fn write<T>(&self, change: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        let mut store = self.inner.lock().await;
        let before = store.clone();

        let value = change(&mut store)?;

        if let Err(e) = self.persist(&store).await {
            tracing::error!(error = %e, "Failed to persist local store, rolling back");
            *store = before;
            return Err(e);
        }

        Ok(value)
    }

    async fn persist(&self, store: &Store) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = store.export_state().to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = temp_path(path);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Queued entries ordered by creation time.
    pub async fn queued(&self) -> Vec<PendingMutation> {
        self.inner.lock().await.queued().into_iter().cloned().collect()
    }

    /// Queued mutations ordered by creation time.
    pub async fn queued_mutations(&self) -> Vec<Mutation> {
        self.inner.lock().await.queued_mutations()
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.lock().await.pending_count()
    }

    pub async fn dead_letters(&self) -> Vec<PendingMutation> {
        self.inner
            .lock()
            .await
            .dead_letters()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.inner
            .lock()
            .await
            .assignments()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn assignment(&self, id: &str) -> Option<Assignment> {
        self.inner.lock().await.assignment(id).cloned()
    }

    pub async fn plans(&self) -> Vec<Plan> {
        self.inner.lock().await.plans().into_iter().cloned().collect()
    }

    pub async fn plan(&self, id: &str) -> Option<Plan> {
        self.inner.lock().await.plan(id).cloned()
    }

    pub async fn exercises(&self) -> Vec<Exercise> {
        self.inner
            .lock()
            .await
            .exercises()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Cached workout history, newest first.
    pub async fn workout_logs(&self) -> Vec<WorkoutLog> {
        self.inner
            .lock()
            .await
            .workout_logs()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Full copy of the current state.
    pub async fn snapshot(&self) -> LocalSnapshot {
        self.inner.lock().await.export_state()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
