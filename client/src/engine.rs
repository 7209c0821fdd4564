//! The sync engine: queue writes, flushes and bootstraps.
//!
//! A [`SyncEngine`] is an explicitly constructed handle. Clones share the
//! same store, transport and single-flight flag, so a clone can be moved
//! into spawned tasks.

use crate::config::SyncConfig;
use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::events::{EventBus, SyncEvent};
use crate::store::LocalStore;
use crate::transport::SyncTransport;
use ptsync_engine::{
    AckReport, BootstrapStats, Mutation, MutationId, MutationIntent, PendingMutation, PushRequest,
    Timestamp,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Result of a [`SyncEngine::flush`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushReport {
    /// Another flush was in flight; nothing was sent
    AlreadyRunning,
    /// The device is offline; nothing was sent
    Offline,
    /// The queue was empty; nothing was sent
    Empty,
    /// One push round trip completed
    Pushed(AckReport),
}

/// Result of a [`SyncEngine::bootstrap`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The device is offline; the cache was left alone
    Skipped,
    /// The cache was replaced
    Applied(BootstrapStats),
}

/// Result of [`SyncEngine::sync_now`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub flush: FlushReport,
    pub bootstrap: BootstrapOutcome,
}

struct Inner<T> {
    store: LocalStore,
    transport: T,
    connectivity: Connectivity,
    config: SyncConfig,
    events: EventBus,
    flushing: AtomicBool,
}

/// Handle to the device-side sync machinery.
pub struct SyncEngine<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SyncEngine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: SyncTransport> SyncEngine<T> {
    pub fn new(
        store: LocalStore,
        transport: T,
        connectivity: Connectivity,
        config: SyncConfig,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            inner: Arc::new(Inner {
                store,
                transport,
                connectivity,
                config,
                events,
                flushing: AtomicBool::new(false),
            }),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.inner.connectivity
    }

    /// Receive lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Record an intent durably and return its id.
    ///
    /// The mutation is on disk before this returns. When online a flush is
    /// started in the background; its outcome is only logged.
    pub async fn enqueue(&self, intent: MutationIntent) -> Result<MutationId> {
        let id = uuid::Uuid::new_v4().to_string();
        let mutation = Mutation::new(id.clone(), &intent, now_millis())?;

        self.inner.store.enqueue(mutation).await?;
        tracing::debug!(mutation_id = %id, kind = %intent.kind(), "Enqueued mutation");

        self.spawn_flush();
        Ok(id)
    }

    /// Push every queued mutation in one batch.
    ///
    /// At most one flush runs at a time; an overlapping call returns
    /// [`FlushReport::AlreadyRunning`] immediately. Only ids the server
    /// reports as processed leave the queue. A transport error leaves the
    /// queue exactly as it was.
    pub async fn flush(&self) -> Result<FlushReport> {
        let Some(_guard) = FlushGuard::acquire(&self.inner.flushing) else {
            tracing::debug!("Flush already in progress");
            return Ok(FlushReport::AlreadyRunning);
        };

        if !self.inner.connectivity.is_online() {
            return Ok(FlushReport::Offline);
        }

        let mutations = self.inner.store.queued_mutations().await;
        if mutations.is_empty() {
            return Ok(FlushReport::Empty);
        }

        let sent: Vec<MutationId> = mutations.iter().map(|m| m.id.clone()).collect();
        let request = PushRequest { mutations };

        let result = match self.inner.transport.push(&request).await {
            Ok(response) => {
                self.inner
                    .store
                    .acknowledge(&sent, &response, now_millis(), self.inner.config.max_attempts)
                    .await
            }
            Err(e) => Err(e),
        };

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, batch = sent.len(), "Flush failed");
                self.inner.events.emit(SyncEvent::FlushFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let remaining = self.inner.store.pending_count().await;
        tracing::info!(
            processed = report.removed.len(),
            failed = report.retained.len() + report.dead_lettered.len(),
            unacknowledged = report.unacknowledged.len(),
            remaining,
            "Flush completed"
        );

        for id in &report.dead_lettered {
            let attempts = self.inner.config.max_attempts.unwrap_or_default();
            tracing::warn!(mutation_id = %id, attempts, "Mutation dead-lettered");
            self.inner.events.emit(SyncEvent::MutationDeadLettered {
                id: id.clone(),
                attempts,
            });
        }

        self.inner.events.emit(SyncEvent::FlushCompleted {
            processed: report.removed.len(),
            failed: report.retained.len() + report.dead_lettered.len(),
            remaining,
        });

        Ok(FlushReport::Pushed(report))
    }

    /// Replace the local cache with the server's snapshot.
    ///
    /// Offline this is a silent no-op. The snapshot is committed in one
    /// write after the whole response has arrived, so a failure keeps the
    /// previous cache.
    pub async fn bootstrap(&self) -> Result<BootstrapOutcome> {
        if !self.inner.connectivity.is_online() {
            tracing::debug!("Offline, skipping bootstrap");
            return Ok(BootstrapOutcome::Skipped);
        }

        let result = match self.inner.transport.pull().await {
            Ok(snapshot) => self.inner.store.apply_bootstrap(&snapshot).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(stats) => {
                tracing::info!(
                    assignments = stats.assignments,
                    exercises = stats.exercises,
                    workout_logs = stats.workout_logs,
                    "Bootstrap completed"
                );
                self.inner
                    .events
                    .emit(SyncEvent::BootstrapCompleted { stats });
                Ok(BootstrapOutcome::Applied(stats))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Bootstrap failed");
                self.inner.events.emit(SyncEvent::BootstrapFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Push pending work, then refresh the cache.
    pub async fn sync_now(&self) -> Result<SyncReport> {
        let flush = self.flush().await?;
        let bootstrap = self.bootstrap().await?;
        Ok(SyncReport { flush, bootstrap })
    }

    /// Mutations withdrawn from automatic retry.
    pub async fn dead_letters(&self) -> Vec<PendingMutation> {
        self.inner.store.dead_letters().await
    }

    /// Put a dead letter back in the queue with a fresh attempt counter.
    pub async fn requeue_dead_letter(&self, id: &str) -> Result<()> {
        self.inner.store.requeue_dead_letter(id).await?;
        tracing::info!(mutation_id = %id, "Requeued dead letter");
        self.spawn_flush();
        Ok(())
    }

    /// Flush on every offline to online transition.
    ///
    /// The task lives as long as the engine; abort the handle to stop it.
    pub fn spawn_connectivity_listener(&self) -> JoinHandle<()> {
        let engine = self.clone();
        let mut rx = self.inner.connectivity.subscribe();
        // Read before spawning so a transition racing the task start is seen
        let mut was_online = *rx.borrow_and_update();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if online && !was_online {
                    tracing::info!("Back online, flushing queue");
                    if let Err(e) = engine.flush().await {
                        tracing::warn!(error = %e, "Flush after reconnect failed");
                    }
                }
                was_online = online;
            }
        })
    }

    fn spawn_flush(&self) {
        if !self.inner.connectivity.is_online() {
            return;
        }

        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.flush().await {
                tracing::warn!(error = %e, "Background flush failed");
            }
        });
    }
}

/// Holds the single-flight flag; releases it on drop.
struct FlushGuard<'a>(&'a AtomicBool);

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn now_millis() -> Timestamp {
    Timestamp::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
