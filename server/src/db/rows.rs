//! Row types for the plan and workout tables, and their assembly into
//! engine types.

use crate::auth::Role;
use chrono::{DateTime, Utc};
use ptsync_engine::{Assignment, Day, Exercise, ExerciseLog, Plan, PlanExercise, SeriesSpecType, WorkoutLog};
use sqlx::{postgres::PgRow, Row};
use std::collections::HashMap;

/// A row from `plans`.
#[derive(Debug)]
pub struct PlanRow {
    pub id: String,
    pub coach_id: String,
    pub title: String,
    pub description: Option<String>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for PlanRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PlanRow {
            id: row.try_get("id")?,
            coach_id: row.try_get("coach_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
        })
    }
}

/// A row from `plan_days`.
#[derive(Debug)]
pub struct DayRow {
    pub id: String,
    pub plan_id: String,
    pub name: String,
    pub order: i32,
}

impl<'r> sqlx::FromRow<'r, PgRow> for DayRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(DayRow {
            id: row.try_get("id")?,
            plan_id: row.try_get("plan_id")?,
            name: row.try_get("name")?,
            order: row.try_get("order")?,
        })
    }
}

/// A row from `plan_exercises` joined with its `exercises` row.
#[derive(Debug)]
pub struct PlanExerciseRow {
    pub day_id: String,
    pub plan_exercise: PlanExercise,
}

impl<'r> sqlx::FromRow<'r, PgRow> for PlanExerciseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("series_spec_type")?;
        let series_spec_type: SeriesSpecType = kind
            .parse()
            .map_err(|e: ptsync_engine::Error| sqlx::Error::Decode(Box::new(e)))?;
        let exercise_id: String = row.try_get("exercise_id")?;

        let exercise = Exercise {
            id: exercise_id.clone(),
            title: row.try_get("exercise_title")?,
            description: row.try_get("exercise_description")?,
            video_url: row.try_get("exercise_video_url")?,
            muscle_group: row.try_get("exercise_muscle_group")?,
            default_series_spec: row.try_get("exercise_default_series_spec")?,
            coach_id: row.try_get("exercise_coach_id")?,
        };

        Ok(PlanExerciseRow {
            day_id: row.try_get("day_id")?,
            plan_exercise: PlanExercise {
                id: row.try_get("id")?,
                exercise_id,
                series_spec_type,
                sets: row.try_get("sets")?,
                reps: row.try_get("reps")?,
                rpe: row.try_get("rpe")?,
                rest_seconds: row.try_get("rest_seconds")?,
                order: row.try_get("order")?,
                exercise: Some(exercise),
            },
        })
    }
}

/// A row from `assigned_plans`.
#[derive(Debug)]
pub struct AssignmentRow {
    pub id: String,
    pub plan_id: String,
    pub student_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl<'r> sqlx::FromRow<'r, PgRow> for AssignmentRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AssignmentRow {
            id: row.try_get("id")?,
            plan_id: row.try_get("plan_id")?,
            student_id: row.try_get("student_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl AssignmentRow {
    pub fn into_assignment(self, plan: Plan) -> Assignment {
        Assignment {
            id: self.id,
            plan_id: self.plan_id,
            student_id: self.student_id,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            plan,
        }
    }
}

/// A row from `exercises`.
#[derive(Debug)]
pub struct ExerciseRow(pub Exercise);

impl<'r> sqlx::FromRow<'r, PgRow> for ExerciseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ExerciseRow(Exercise {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            video_url: row.try_get("video_url")?,
            muscle_group: row.try_get("muscle_group")?,
            default_series_spec: row.try_get("default_series_spec")?,
            coach_id: row.try_get("coach_id")?,
        }))
    }
}

/// A row from `users`.
#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
    pub coach_id: Option<String>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse::<Role>().map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(UserRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role,
            password_hash: row.try_get("password_hash")?,
            coach_id: row.try_get("coach_id")?,
        })
    }
}

/// A row from `workout_logs`.
#[derive(Debug)]
pub struct WorkoutLogRow {
    pub id: String,
    pub student_id: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub feedback: Option<String>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for WorkoutLogRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(WorkoutLogRow {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            date: row.try_get("date")?,
            duration_minutes: row.try_get("duration_minutes")?,
            feedback: row.try_get("feedback")?,
        })
    }
}

/// A row from `exercise_logs`.
#[derive(Debug)]
pub struct ExerciseLogRow {
    pub workout_log_id: String,
    pub log: ExerciseLog,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ExerciseLogRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ExerciseLogRow {
            workout_log_id: row.try_get("workout_log_id")?,
            log: ExerciseLog {
                id: row.try_get("id")?,
                exercise_id: row.try_get("exercise_id")?,
                set_number: row.try_get("set_number")?,
                reps: row.try_get("reps")?,
                weight: row.try_get("weight")?,
                rpe: row.try_get("rpe")?,
            },
        })
    }
}

/// Nest days and exercises under their plans, sorted by `order`.
pub fn assemble_plans(
    plans: Vec<PlanRow>,
    days: Vec<DayRow>,
    exercises: Vec<PlanExerciseRow>,
) -> HashMap<String, Plan> {
    let mut by_day: HashMap<String, Vec<PlanExercise>> = HashMap::new();
    for row in exercises {
        by_day.entry(row.day_id).or_default().push(row.plan_exercise);
    }

    let mut by_plan: HashMap<String, Vec<Day>> = HashMap::new();
    for row in days {
        let exercises = by_day.remove(&row.id).unwrap_or_default();
        by_plan.entry(row.plan_id).or_default().push(Day {
            id: row.id,
            name: row.name,
            order: row.order,
            exercises,
        });
    }

    plans
        .into_iter()
        .map(|row| {
            let plan = Plan {
                days: by_plan.remove(&row.id).unwrap_or_default(),
                id: row.id.clone(),
                coach_id: Some(row.coach_id),
                title: row.title,
                description: row.description,
            }
            .sorted();
            (row.id, plan)
        })
        .collect()
}

/// Attach set rows to their workout logs, keeping the log order.
pub fn attach_exercise_logs(logs: Vec<WorkoutLogRow>, sets: Vec<ExerciseLogRow>) -> Vec<WorkoutLog> {
    let mut by_log: HashMap<String, Vec<ExerciseLog>> = HashMap::new();
    for row in sets {
        by_log.entry(row.workout_log_id).or_default().push(row.log);
    }

    logs.into_iter()
        .map(|row| WorkoutLog {
            exercise_logs: by_log.remove(&row.id).unwrap_or_default(),
            id: row.id,
            student_id: row.student_id,
            date: row.date,
            duration_minutes: row.duration_minutes,
            feedback: row.feedback,
        })
        .collect()
}
