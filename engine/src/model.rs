//! Server-authoritative entities cached on the device.
//!
//! Primary keys are generated by the server. The client never invents ids for
//! these types; it only stores what bootstrap hands back.

use crate::plan::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the sets of a plan exercise are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeriesSpecType {
    /// Repetitions per set
    Reps,
    /// Seconds per set
    Time,
}

impl SeriesSpecType {
    /// Database/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesSpecType::Reps => "REPS",
            SeriesSpecType::Time => "TIME",
        }
    }
}

impl std::str::FromStr for SeriesSpecType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPS" => Ok(SeriesSpecType::Reps),
            "TIME" => Ok(SeriesSpecType::Time),
            other => Err(crate::Error::field(
                "seriesSpecType",
                format!("unknown value '{}'", other),
            )),
        }
    }
}

/// An exercise definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_series_spec: Option<String>,
    /// `None` for global exercises shared by every coach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<String>,
}

/// Request body for a coach-defined exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub default_series_spec: Option<String>,
}

impl NewExercise {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::Error::field("title", "must not be empty"));
        }
        if let Some(spec) = &self.default_series_spec {
            crate::series::validate(spec)?;
        }
        Ok(())
    }
}

/// A plan bound to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub plan_id: String,
    pub student_id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// The assigned plan with its days and exercises
    pub plan: Plan,
}

/// One logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: String,
    pub exercise_id: String,
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
    pub rpe: i32,
}

/// A completed workout with all its logged sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub student_id: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default)]
    pub exercise_logs: Vec<ExerciseLog>,
}

impl WorkoutLog {
    /// Total number of logged sets.
    pub fn set_count(&self) -> usize {
        self.exercise_logs.len()
    }
}
