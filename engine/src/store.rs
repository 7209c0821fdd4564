//! Store - the in-memory local state container.
//!
//! The Store holds the cached server snapshot and the pending mutation queue.
//! It knows nothing about disks or networks; the client crate persists it by
//! exporting a [`LocalSnapshot`] after every change.

use crate::model::{Assignment, Exercise, WorkoutLog};
use crate::plan::Plan;
use crate::snapshot::{LocalSnapshot, LOCAL_FORMAT_VERSION};
use crate::{
    error::Result, BootstrapSnapshot, Error, Mutation, MutationId, PendingMutation, PushResponse,
    Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What acknowledging a push did to the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckReport {
    /// Removed because the server processed them
    pub removed: Vec<MutationId>,
    /// Still queued after a reported failure
    pub retained: Vec<MutationId>,
    /// Moved out of the queue after too many failures
    pub dead_lettered: Vec<MutationId>,
    /// Sent but not mentioned in the response; left untouched
    pub unacknowledged: Vec<MutationId>,
}

/// Row counts written by a bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapStats {
    pub assignments: usize,
    pub plans: usize,
    pub exercises: usize,
    pub workout_logs: usize,
}

/// The local state of one device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    exercises: HashMap<String, Exercise>,
    plans: HashMap<String, Plan>,
    assignments: HashMap<String, Assignment>,
    workout_logs: HashMap<String, WorkoutLog>,
    sync_queue: HashMap<MutationId, PendingMutation>,
    dead_letters: HashMap<MutationId, PendingMutation>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------

    /// Add a mutation to the queue, replacing any entry with the same id.
    pub fn enqueue(&mut self, mutation: Mutation) {
        self.sync_queue
            .insert(mutation.id.clone(), PendingMutation::new(mutation));
    }

    /// Queued entries ordered by creation time, then id.
    pub fn queued(&self) -> Vec<&PendingMutation> {
        let mut entries: Vec<_> = self.sync_queue.values().collect();
        entries.sort_by(|a, b| {
            a.mutation
                .timestamp
                .cmp(&b.mutation.timestamp)
                .then_with(|| a.id().cmp(b.id()))
        });
        entries
    }

    /// Mutations to send in the next push.
    pub fn queued_mutations(&self) -> Vec<Mutation> {
        self.queued().into_iter().map(|p| p.mutation.clone()).collect()
    }

    /// Get a queued entry by id.
    pub fn pending(&self, id: &str) -> Option<&PendingMutation> {
        self.sync_queue.get(id)
    }

    /// Number of queued mutations.
    pub fn pending_count(&self) -> usize {
        self.sync_queue.len()
    }

    /// Apply a push response to the queue.
    ///
    /// Only ids in `processed_ids` are removed. Failed ids stay queued with a
    /// bumped attempt counter, unless `max_attempts` is reached, in which case
    /// they move to the dead-letter set. Ids in `sent` that the response does
    /// not mention are left exactly as they were, and so is anything enqueued
    /// after the batch was read.
    pub fn acknowledge(
        &mut self,
        sent: &[MutationId],
        response: &PushResponse,
        now: Timestamp,
        max_attempts: Option<u32>,
    ) -> AckReport {
        let mut report = AckReport::default();

        for id in &response.processed_ids {
            if self.sync_queue.remove(id).is_some() {
                report.removed.push(id.clone());
            }
        }

        for id in &response.failed_ids {
            let Some(entry) = self.sync_queue.get_mut(id) else {
                continue;
            };
            entry.attempts += 1;
            entry.last_failed_at = Some(now);

            if max_attempts.is_some_and(|max| entry.attempts >= max) {
                if let Some(entry) = self.sync_queue.remove(id) {
                    self.dead_letters.insert(id.clone(), entry);
                    report.dead_lettered.push(id.clone());
                }
            } else {
                report.retained.push(id.clone());
            }
        }

        let mentioned: HashSet<_> = response
            .processed_ids
            .iter()
            .chain(response.failed_ids.iter())
            .collect();
        report.unacknowledged = sent
            .iter()
            .filter(|id| !mentioned.contains(id))
            .cloned()
            .collect();

        report
    }

    /// Dead-lettered entries ordered by creation time.
    pub fn dead_letters(&self) -> Vec<&PendingMutation> {
        let mut entries: Vec<_> = self.dead_letters.values().collect();
        entries.sort_by_key(|p| (p.mutation.timestamp, p.id().clone()));
        entries
    }

    /// Move a dead letter back into the queue with a fresh attempt counter.
    pub fn requeue_dead_letter(&mut self, id: &str) -> Result<()> {
        let entry = self
            .dead_letters
            .remove(id)
            .ok_or_else(|| Error::MutationNotFound(id.to_string()))?;
        self.sync_queue
            .insert(entry.mutation.id.clone(), PendingMutation::new(entry.mutation));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cached snapshot
    // ------------------------------------------------------------------

    /// Replace every cache container with the contents of a bootstrap.
    ///
    /// Rows are keyed by primary id, so applying the same snapshot twice
    /// leaves the store unchanged. The queue is never touched.
    pub fn apply_bootstrap(&mut self, snapshot: &BootstrapSnapshot) -> BootstrapStats {
        self.assignments = snapshot
            .assigned_plans
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect();
        self.plans = snapshot
            .assigned_plans
            .iter()
            .map(|a| (a.plan.id.clone(), a.plan.clone()))
            .collect();
        self.exercises = snapshot
            .exercises
            .iter()
            .map(|e| (e.id.clone(), e.clone()))
            .collect();
        self.workout_logs = snapshot
            .workout_logs
            .iter()
            .map(|l| (l.id.clone(), l.clone()))
            .collect();

        BootstrapStats {
            assignments: self.assignments.len(),
            plans: self.plans.len(),
            exercises: self.exercises.len(),
            workout_logs: self.workout_logs.len(),
        }
    }

    /// Get an assignment by id.
    pub fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.get(id)
    }

    /// All cached assignments ordered by start date.
    pub fn assignments(&self) -> Vec<&Assignment> {
        let mut list: Vec<_> = self.assignments.values().collect();
        list.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Get a plan by id.
    pub fn plan(&self, id: &str) -> Option<&Plan> {
        self.plans.get(id)
    }

    /// All cached plans ordered by title.
    pub fn plans(&self) -> Vec<&Plan> {
        let mut list: Vec<_> = self.plans.values().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// All cached exercises ordered by title.
    pub fn exercises(&self) -> Vec<&Exercise> {
        let mut list: Vec<_> = self.exercises.values().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Cached workout logs, newest first.
    pub fn workout_logs(&self) -> Vec<&WorkoutLog> {
        let mut list: Vec<_> = self.workout_logs.values().collect();
        list.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        list
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Export the full state as a snapshot.
    pub fn export_state(&self) -> LocalSnapshot {
        fn sorted<V: Clone>(map: &HashMap<String, V>) -> std::collections::BTreeMap<String, V> {
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        }

        LocalSnapshot {
            format_version: LOCAL_FORMAT_VERSION,
            exercises: sorted(&self.exercises),
            plans: sorted(&self.plans),
            assignments: sorted(&self.assignments),
            workout_logs: sorted(&self.workout_logs),
            sync_queue: sorted(&self.sync_queue),
            dead_letters: sorted(&self.dead_letters),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn import_state(snapshot: LocalSnapshot) -> Result<Self> {
        if snapshot.format_version != LOCAL_FORMAT_VERSION {
            return Err(Error::UnsupportedFormat {
                found: snapshot.format_version,
                supported: LOCAL_FORMAT_VERSION,
            });
        }

        for (key, pending) in &snapshot.sync_queue {
            if key != pending.id() {
                return Err(Error::InvalidState(format!(
                    "queue key '{}' does not match mutation id '{}'",
                    key,
                    pending.id()
                )));
            }
        }

        Ok(Self {
            exercises: snapshot.exercises.into_iter().collect(),
            plans: snapshot.plans.into_iter().collect(),
            assignments: snapshot.assignments.into_iter().collect(),
            workout_logs: snapshot.workout_logs.into_iter().collect(),
            sync_queue: snapshot.sync_queue.into_iter().collect(),
            dead_letters: snapshot.dead_letters.into_iter().collect(),
        })
    }
}
