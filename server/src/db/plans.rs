//! Plan and assignment persistence.

use super::rows::{assemble_plans, AssignmentRow, DayRow, PlanExerciseRow, PlanRow};
use chrono::{DateTime, Utc};
use ptsync_engine::{NewPlan, Plan};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Load plans with their days and exercises, keyed by plan id.
pub async fn load_plans(
    pool: &PgPool,
    plan_ids: &[String],
) -> Result<HashMap<String, Plan>, sqlx::Error> {
    if plan_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let plans = sqlx::query_as::<_, PlanRow>(
        r#"
        SELECT id, coach_id, title, description
        FROM plans
        WHERE id = ANY($1)
        "#,
    )
    .bind(plan_ids)
    .fetch_all(pool)
    .await?;

    let days = sqlx::query_as::<_, DayRow>(
        r#"
        SELECT id, plan_id, name, "order"
        FROM plan_days
        WHERE plan_id = ANY($1)
        ORDER BY plan_id, "order"
        "#,
    )
    .bind(plan_ids)
    .fetch_all(pool)
    .await?;

    let day_ids: Vec<String> = days.iter().map(|d| d.id.clone()).collect();
    let exercises = sqlx::query_as::<_, PlanExerciseRow>(
        r#"
        SELECT pe.id, pe.day_id, pe.exercise_id, pe.series_spec_type, pe.sets,
               pe.reps, pe.rpe, pe.rest_seconds, pe."order",
               e.title AS exercise_title,
               e.description AS exercise_description,
               e.video_url AS exercise_video_url,
               e.muscle_group AS exercise_muscle_group,
               e.default_series_spec AS exercise_default_series_spec,
               e.coach_id AS exercise_coach_id
        FROM plan_exercises pe
        JOIN exercises e ON e.id = pe.exercise_id
        WHERE pe.day_id = ANY($1)
        ORDER BY pe.day_id, pe."order"
        "#,
    )
    .bind(&day_ids)
    .fetch_all(pool)
    .await?;

    Ok(assemble_plans(plans, days, exercises))
}

/// Load one plan with its days and exercises.
pub async fn get_plan(pool: &PgPool, plan_id: &str) -> Result<Option<Plan>, sqlx::Error> {
    let mut plans = load_plans(pool, &[plan_id.to_string()]).await?;
    Ok(plans.remove(plan_id))
}

/// Insert a validated plan and all its children in one transaction.
///
/// Returns the new plan id.
pub async fn insert_plan(pool: &PgPool, coach_id: &str, plan: &NewPlan) -> Result<String, sqlx::Error> {
    let plan_id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO plans (id, coach_id, title, description)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&plan_id)
    .bind(coach_id)
    .bind(plan.title.trim())
    .bind(&plan.description)
    .execute(&mut *tx)
    .await?;

    for day in &plan.days {
        let day_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO plan_days (id, plan_id, name, "order")
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&day_id)
        .bind(&plan_id)
        .bind(day.name.trim())
        .bind(day.order)
        .execute(&mut *tx)
        .await?;

        for exercise in &day.exercises {
            sqlx::query(
                r#"
                INSERT INTO plan_exercises (
                    id, day_id, exercise_id, series_spec_type, sets,
                    reps, rpe, rest_seconds, "order"
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&day_id)
            .bind(&exercise.exercise_id)
            .bind(exercise.series_spec_type.as_str())
            .bind(exercise.sets)
            .bind(&exercise.reps)
            .bind(exercise.rpe)
            .bind(exercise.rest_seconds)
            .bind(exercise.order)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(plan_id)
}

/// Owner of a plan, if the plan exists.
pub async fn plan_coach(pool: &PgPool, plan_id: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(r#"SELECT coach_id FROM plans WHERE id = $1"#)
        .bind(plan_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}

/// Whether `student_id` is a student coached by `coach_id`.
pub async fn is_student_of(pool: &PgPool, student_id: &str, coach_id: &str) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE id = $1 AND role = 'student' AND coach_id = $2
        )
        "#,
    )
    .bind(student_id)
    .bind(coach_id)
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

/// Whether the plan has ever been assigned to the student.
pub async fn is_assigned_to(pool: &PgPool, plan_id: &str, student_id: &str) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        r#"SELECT EXISTS(SELECT 1 FROM assigned_plans WHERE plan_id = $1 AND student_id = $2)"#,
    )
    .bind(plan_id)
    .bind(student_id)
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

/// Create an active assignment.
pub async fn insert_assignment(
    pool: &PgPool,
    plan_id: &str,
    student_id: &str,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<AssignmentRow, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(
        r#"
        INSERT INTO assigned_plans (id, plan_id, student_id, start_date, end_date, is_active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING id, plan_id, student_id, start_date, end_date, is_active
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(plan_id)
    .bind(student_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await
}

/// Active assignments of a student with their plans, oldest first.
pub async fn active_assignments(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<ptsync_engine::Assignment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssignmentRow>(
        r#"
        SELECT id, plan_id, student_id, start_date, end_date, is_active
        FROM assigned_plans
        WHERE student_id = $1 AND is_active
        ORDER BY start_date ASC, id ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let plan_ids: Vec<String> = rows.iter().map(|r| r.plan_id.clone()).collect();
    let plans = load_plans(pool, &plan_ids).await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let plan = plans.get(&row.plan_id)?.clone();
            Some(row.into_assignment(plan))
        })
        .collect())
}
