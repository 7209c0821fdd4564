//! Workout logging payload and its validation.
//!
//! The payload is what the workout screen enqueues. [`WorkoutPayload::into_draft`]
//! validates it and flattens it into the rows the server writes in one
//! transaction.

use crate::{error::Result, Error, Timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One set as entered on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPayload {
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
    pub rpe: i32,
}

/// All sets logged for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePayload {
    pub exercise_id: String,
    #[serde(default)]
    pub sets: Vec<SetPayload>,
}

/// Payload of a `LOG_WORKOUT` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_id: Option<String>,
    pub duration_minutes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// When the workout finished; falls back to the mutation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub exercises: Vec<ExercisePayload>,
}

/// A validated set row ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDraft {
    pub exercise_id: String,
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
    pub rpe: i32,
}

/// A validated workout log ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutLogDraft {
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub feedback: Option<String>,
    pub sets: Vec<SetDraft>,
}

impl WorkoutPayload {
    /// Validate and flatten into insertable rows.
    pub fn into_draft(self, fallback_timestamp: Timestamp) -> Result<WorkoutLogDraft> {
        if self.duration_minutes < 0 {
            return Err(Error::field("durationMinutes", "must not be negative"));
        }

        let millis = self.timestamp.unwrap_or(fallback_timestamp);
        let date = i64::try_from(millis)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| Error::field("timestamp", "out of range"))?;

        let mut sets = Vec::new();
        for (ei, exercise) in self.exercises.into_iter().enumerate() {
            if exercise.exercise_id.trim().is_empty() {
                return Err(Error::field(
                    format!("exercises[{}].exerciseId", ei),
                    "must not be empty",
                ));
            }

            let mut numbers = HashSet::new();
            for (si, set) in exercise.sets.into_iter().enumerate() {
                let path = format!("exercises[{}].sets[{}]", ei, si);
                validate_set(&path, &set)?;
                if !numbers.insert(set.set_number) {
                    return Err(Error::field(
                        format!("{}.setNumber", path),
                        format!("duplicate set number {}", set.set_number),
                    ));
                }
                sets.push(SetDraft {
                    exercise_id: exercise.exercise_id.clone(),
                    set_number: set.set_number,
                    reps: set.reps,
                    weight: set.weight,
                    rpe: set.rpe,
                });
            }
        }

        Ok(WorkoutLogDraft {
            date,
            duration_minutes: self.duration_minutes,
            feedback: self.feedback.filter(|f| !f.trim().is_empty()),
            sets,
        })
    }
}

fn validate_set(path: &str, set: &SetPayload) -> Result<()> {
    if set.set_number < 1 {
        return Err(Error::field(format!("{}.setNumber", path), "must be at least 1"));
    }
    if set.reps < 0 {
        return Err(Error::field(format!("{}.reps", path), "must not be negative"));
    }
    if !set.weight.is_finite() || set.weight < 0.0 {
        return Err(Error::field(
            format!("{}.weight", path),
            "must be a non-negative number",
        ));
    }
    if !(0..=10).contains(&set.rpe) {
        return Err(Error::field(format!("{}.rpe", path), "must be between 0 and 10"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(n: i32) -> SetPayload {
        SetPayload {
            set_number: n,
            reps: 10,
            weight: 50.0,
            rpe: 8,
        }
    }

    fn payload(exercises: Vec<ExercisePayload>) -> WorkoutPayload {
        WorkoutPayload {
            plan_id: None,
            day_id: None,
            duration_minutes: 40,
            feedback: Some("".into()),
            timestamp: None,
            exercises,
        }
    }

    #[test]
    fn flattens_sets_across_exercises() {
        let draft = payload(vec![
            ExercisePayload {
                exercise_id: "squat".into(),
                sets: vec![set(1), set(2), set(3)],
            },
            ExercisePayload {
                exercise_id: "bench".into(),
                sets: vec![set(1)],
            },
            ExercisePayload {
                exercise_id: "row".into(),
                sets: vec![set(1), set(2)],
            },
        ])
        .into_draft(1706745600000)
        .unwrap();

        assert_eq!(draft.sets.len(), 6);
        assert_eq!(draft.sets[3].exercise_id, "bench");
        assert_eq!(draft.date.timestamp_millis(), 1706745600000);
        assert_eq!(draft.feedback, None);
    }

    #[test]
    fn payload_timestamp_takes_precedence() {
        let mut p = payload(vec![]);
        p.timestamp = Some(5_000);
        let draft = p.into_draft(9_000).unwrap();
        assert_eq!(draft.date.timestamp_millis(), 5_000);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            SetPayload { set_number: 0, ..set(1) },
            SetPayload { reps: -1, ..set(1) },
            SetPayload { weight: f64::NAN, ..set(1) },
            SetPayload { weight: -2.5, ..set(1) },
            SetPayload { rpe: 11, ..set(1) },
        ];

        for bad in cases {
            let result = payload(vec![ExercisePayload {
                exercise_id: "squat".into(),
                sets: vec![bad.clone()],
            }])
            .into_draft(0);
            assert!(
                matches!(result, Err(Error::InvalidField { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_duplicate_set_numbers() {
        let result = payload(vec![ExercisePayload {
            exercise_id: "squat".into(),
            sets: vec![set(1), set(1)],
        }])
        .into_draft(0);

        assert!(matches!(result, Err(Error::InvalidField { .. })));
    }

    #[test]
    fn rejects_blank_exercise_id() {
        let result = payload(vec![ExercisePayload {
            exercise_id: " ".into(),
            sets: vec![set(1)],
        }])
        .into_draft(0);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_duration() {
        let mut p = payload(vec![]);
        p.duration_minutes = -5;
        assert!(p.into_draft(0).is_err());
    }
}
