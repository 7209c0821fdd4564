//! Exercise catalog handlers.

use crate::db;
use crate::error::Result;
use ptsync_engine::{Exercise, NewExercise};
use sqlx::PgPool;

/// Validate and store a coach-owned exercise.
pub async fn create_exercise(pool: &PgPool, coach_id: &str, exercise: NewExercise) -> Result<Exercise> {
    exercise.validate()?;
    let exercise = db::insert_exercise(pool, coach_id, &exercise).await?;
    tracing::info!(exercise_id = %exercise.id, coach_id, "Exercise created");
    Ok(exercise)
}

/// Global exercises plus those owned by the user or their coach.
pub async fn list_exercises(pool: &PgPool, user_id: &str) -> Result<Vec<Exercise>> {
    Ok(db::list_exercises(pool, user_id).await?)
}
