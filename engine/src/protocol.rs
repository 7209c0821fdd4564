//! Wire types for the sync endpoints.

use crate::model::{Assignment, Exercise, WorkoutLog};
use crate::{Mutation, MutationId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Body of `POST /sync/push`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub mutations: Vec<Mutation>,
}

/// Per-item outcome of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    #[serde(default)]
    pub processed_ids: Vec<MutationId>,
    #[serde(default)]
    pub failed_ids: Vec<MutationId>,
}

impl PushResponse {
    pub fn processed(&mut self, id: impl Into<MutationId>) {
        self.processed_ids.push(id.into());
    }

    pub fn failed(&mut self, id: impl Into<MutationId>) {
        self.failed_ids.push(id.into());
    }

    /// Whether every id in `mutations` appears in exactly one of the lists.
    pub fn accounts_for(&self, mutations: &[Mutation]) -> bool {
        let processed: HashSet<_> = self.processed_ids.iter().collect();
        let failed: HashSet<_> = self.failed_ids.iter().collect();
        mutations
            .iter()
            .all(|m| processed.contains(&m.id) != failed.contains(&m.id))
    }
}

/// Body of `GET /sync/bootstrap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSnapshot {
    /// Active assignments with nested plan -> days -> exercises
    pub assigned_plans: Vec<Assignment>,
    /// Logs from the trailing window
    pub workout_logs: Vec<WorkoutLog>,
    /// Unique exercises referenced by the assigned plans
    pub exercises: Vec<Exercise>,
    /// Server time when the snapshot was assembled
    pub timestamp: Timestamp,
}

impl BootstrapSnapshot {
    /// Assemble a snapshot, sorting plan children and deriving the exercise set.
    pub fn assemble(
        assigned_plans: Vec<Assignment>,
        workout_logs: Vec<WorkoutLog>,
        timestamp: Timestamp,
    ) -> Self {
        let assigned_plans: Vec<_> = assigned_plans
            .into_iter()
            .map(|mut a| {
                a.plan.sort_by_order();
                a
            })
            .collect();
        let exercises = referenced_exercises(&assigned_plans);

        Self {
            assigned_plans,
            workout_logs,
            exercises,
            timestamp,
        }
    }
}

/// De-duplicated exercises referenced by a set of assignments, sorted by id.
pub fn referenced_exercises(assignments: &[Assignment]) -> Vec<Exercise> {
    let mut unique = BTreeMap::new();
    for exercise in assignments.iter().flat_map(|a| a.plan.exercises()) {
        unique
            .entry(exercise.id.clone())
            .or_insert_with(|| exercise.clone());
    }
    unique.into_values().collect()
}
