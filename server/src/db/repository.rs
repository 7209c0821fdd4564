//! Storage seam for the sync endpoints.

use super::{plans, workouts, LoggedWorkout, WorkoutWrite};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ptsync_engine::{Assignment, WorkoutLog};
use sqlx::PgPool;

/// What the sync handlers need from storage.
#[async_trait]
pub trait SyncRepository: Send + Sync {
    /// Active assignments of a student with fully joined plans.
    async fn active_assignments(&self, student_id: &str) -> Result<Vec<Assignment>, sqlx::Error>;

    /// Workout logs of a student dated on or after `since`.
    async fn recent_workout_logs(
        &self,
        student_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>, sqlx::Error>;

    /// Atomically write a workout, at most once per mutation id.
    async fn record_workout(
        &self,
        student_id: &str,
        workout: &LoggedWorkout,
    ) -> Result<WorkoutWrite, sqlx::Error>;
}

/// [`SyncRepository`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgSyncRepository {
    pool: PgPool,
}

impl PgSyncRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncRepository for PgSyncRepository {
    async fn active_assignments(&self, student_id: &str) -> Result<Vec<Assignment>, sqlx::Error> {
        plans::active_assignments(&self.pool, student_id).await
    }

    async fn recent_workout_logs(
        &self,
        student_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>, sqlx::Error> {
        workouts::recent_workout_logs(&self.pool, student_id, since).await
    }

    async fn record_workout(
        &self,
        student_id: &str,
        workout: &LoggedWorkout,
    ) -> Result<WorkoutWrite, sqlx::Error> {
        workouts::record_workout(&self.pool, student_id, workout).await
    }
}
