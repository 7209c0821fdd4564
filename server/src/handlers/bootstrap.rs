//! Bootstrap handler - assembles the authoritative snapshot for a student.

use crate::db::SyncRepository;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use ptsync_engine::{BootstrapSnapshot, Timestamp};

/// Build the bootstrap snapshot for `student_id`.
///
/// Active assignments come with their full plan tree sorted by `order`;
/// workout logs are limited to the trailing `window_days`.
pub async fn handle_bootstrap(
    repo: &dyn SyncRepository,
    student_id: &str,
    window_days: i64,
) -> Result<BootstrapSnapshot> {
    let now = Utc::now();
    let since = window_start(now, window_days);

    let assignments = repo.active_assignments(student_id).await?;
    let workout_logs = repo.recent_workout_logs(student_id, since).await?;

    let snapshot = BootstrapSnapshot::assemble(
        assignments,
        workout_logs,
        Timestamp::try_from(now.timestamp_millis()).unwrap_or_default(),
    );

    tracing::info!(
        student_id,
        assignments = snapshot.assigned_plans.len(),
        workout_logs = snapshot.workout_logs.len(),
        exercises = snapshot.exercises.len(),
        "Bootstrap served"
    );

    Ok(snapshot)
}

fn window_start(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    Duration::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
