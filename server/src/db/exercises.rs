//! Exercise catalog persistence.

use super::rows::ExerciseRow;
use ptsync_engine::{Exercise, NewExercise};
use sqlx::PgPool;
use uuid::Uuid;

/// Exercises visible to a user, ordered by title.
///
/// Global exercises have no coach. A coach also sees their own; a student
/// also sees their coach's.
pub async fn list_exercises(pool: &PgPool, user_id: &str) -> Result<Vec<Exercise>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExerciseRow>(
        r#"
        SELECT id, title, description, video_url, muscle_group, default_series_spec, coach_id
        FROM exercises
        WHERE coach_id IS NULL
           OR coach_id = $1
           OR coach_id = (SELECT coach_id FROM users WHERE id = $1)
        ORDER BY title, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|ExerciseRow(e)| e).collect())
}

/// Insert a validated exercise owned by a coach.
pub async fn insert_exercise(
    pool: &PgPool,
    coach_id: &str,
    exercise: &NewExercise,
) -> Result<Exercise, sqlx::Error> {
    let row = sqlx::query_as::<_, ExerciseRow>(
        r#"
        INSERT INTO exercises (id, title, description, video_url, muscle_group, default_series_spec, coach_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, description, video_url, muscle_group, default_series_spec, coach_id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(exercise.title.trim())
    .bind(&exercise.description)
    .bind(&exercise.video_url)
    .bind(&exercise.muscle_group)
    .bind(&exercise.default_series_spec)
    .bind(coach_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
