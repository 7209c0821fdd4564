//! Workout log persistence and the idempotency ledger.

use super::rows::{attach_exercise_logs, ExerciseLogRow, WorkoutLogRow};
use chrono::{DateTime, Utc};
use ptsync_engine::{MutationId, WorkoutLog, WorkoutLogDraft};
use sqlx::PgPool;
use uuid::Uuid;

/// A decoded `LOG_WORKOUT` mutation ready to be written.
#[derive(Debug, Clone)]
pub struct LoggedWorkout {
    pub mutation_id: MutationId,
    pub plan_id: Option<String>,
    pub day_id: Option<String>,
    pub draft: WorkoutLogDraft,
}

/// Outcome of writing a workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutWrite {
    Inserted { workout_log_id: String, sets: usize },
    /// The mutation id was applied before; nothing was written
    AlreadyProcessed,
}

/// Check if a mutation id has already been applied.
pub async fn mutation_processed(pool: &PgPool, mutation_id: &str) -> Result<bool, sqlx::Error> {
    let result: (bool,) =
        sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM processed_mutations WHERE mutation_id = $1)"#)
            .bind(mutation_id)
            .fetch_one(pool)
            .await?;

    Ok(result.0)
}

/// Write the workout log, its set rows and the idempotency record in one
/// transaction.
///
/// Either every row lands or none does. A mutation id that is already in
/// the ledger, including one committed by a concurrent request, is reported
/// as [`WorkoutWrite::AlreadyProcessed`].
pub async fn record_workout(
    pool: &PgPool,
    student_id: &str,
    workout: &LoggedWorkout,
) -> Result<WorkoutWrite, sqlx::Error> {
    if mutation_processed(pool, &workout.mutation_id).await? {
        return Ok(WorkoutWrite::AlreadyProcessed);
    }

    let workout_log_id = Uuid::new_v4().to_string();
    let draft = &workout.draft;
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO workout_logs (id, student_id, plan_id, day_id, date, duration_minutes, feedback)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&workout_log_id)
    .bind(student_id)
    .bind(&workout.plan_id)
    .bind(&workout.day_id)
    .bind(draft.date)
    .bind(draft.duration_minutes)
    .bind(&draft.feedback)
    .execute(&mut *tx)
    .await?;

    for set in &draft.sets {
        sqlx::query(
            r#"
            INSERT INTO exercise_logs (id, workout_log_id, exercise_id, set_number, reps, weight, rpe)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&workout_log_id)
        .bind(&set.exercise_id)
        .bind(set.set_number)
        .bind(set.reps)
        .bind(set.weight)
        .bind(set.rpe)
        .execute(&mut *tx)
        .await?;
    }

    let claimed = sqlx::query(
        r#"
        INSERT INTO processed_mutations (mutation_id, student_id, workout_log_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&workout.mutation_id)
    .bind(student_id)
    .bind(&workout_log_id)
    .execute(&mut *tx)
    .await;

    match claimed {
        Ok(_) => {}
        // Another request committed the same mutation id first
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            return Ok(WorkoutWrite::AlreadyProcessed);
        }
        Err(e) => return Err(e),
    }

    tx.commit().await?;

    Ok(WorkoutWrite::Inserted {
        workout_log_id,
        sets: draft.sets.len(),
    })
}

/// Workout logs of a student since `since`, newest first, with set rows.
pub async fn recent_workout_logs(
    pool: &PgPool,
    student_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<WorkoutLog>, sqlx::Error> {
    let logs = sqlx::query_as::<_, WorkoutLogRow>(
        r#"
        SELECT id, student_id, date, duration_minutes, feedback
        FROM workout_logs
        WHERE student_id = $1 AND date >= $2
        ORDER BY date DESC, id ASC
        "#,
    )
    .bind(student_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    let log_ids: Vec<String> = logs.iter().map(|l| l.id.clone()).collect();
    let sets = sqlx::query_as::<_, ExerciseLogRow>(
        r#"
        SELECT id, workout_log_id, exercise_id, set_number, reps, weight, rpe
        FROM exercise_logs
        WHERE workout_log_id = ANY($1)
        ORDER BY workout_log_id, exercise_id, set_number
        "#,
    )
    .bind(&log_ids)
    .fetch_all(pool)
    .await?;

    Ok(attach_exercise_logs(logs, sets))
}

/// Check if a SQL error is a unique constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    has_code(e, "23505")
}

/// Check if a SQL error is a foreign key violation.
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    has_code(e, "23503")
}

fn has_code(e: &sqlx::Error, code: &str) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        db_err.code().map(|c| c == code).unwrap_or(false)
    } else {
        false
    }
}
