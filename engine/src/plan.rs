//! Training plans and their ordering rules.
//!
//! A plan holds ordered days, a day holds ordered exercises. `order` values
//! must be unique within their parent, and every read returns children sorted
//! ascending by `order` no matter how they were inserted.

use crate::model::{Exercise, SeriesSpecType};
use crate::{error::Result, series, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An exercise slot within a plan day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanExercise {
    pub id: String,
    pub exercise_id: String,
    pub series_spec_type: SeriesSpecType,
    pub sets: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<i32>,
    pub order: i32,
    /// Joined exercise definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
}

/// A training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
}

/// A training plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Plan {
    /// Sort days and each day's exercises ascending by `order`.
    pub fn sort_by_order(&mut self) {
        self.days.sort_by_key(|d| d.order);
        for day in &mut self.days {
            day.exercises.sort_by_key(|e| e.order);
        }
    }

    /// Consume and return the plan sorted by `order`.
    pub fn sorted(mut self) -> Self {
        self.sort_by_order();
        self
    }

    /// Exercise definitions joined into this plan, in plan order.
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.days
            .iter()
            .flat_map(|d| d.exercises.iter())
            .filter_map(|pe| pe.exercise.as_ref())
    }
}

/// Input for one exercise slot of a new plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlanExercise {
    pub exercise_id: String,
    pub series_spec_type: SeriesSpecType,
    pub sets: i32,
    #[serde(default)]
    pub reps: Option<String>,
    #[serde(default)]
    pub rpe: Option<i32>,
    #[serde(default)]
    pub rest_seconds: Option<i32>,
    pub order: i32,
}

/// Input for one day of a new plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDay {
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub exercises: Vec<NewPlanExercise>,
}

/// Input for creating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<NewDay>,
}

impl NewPlan {
    /// Check the plan before it is persisted.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::field("title", "must not be empty"));
        }

        ensure_unique_orders("plan", self.days.iter().map(|d| d.order))?;

        for (di, day) in self.days.iter().enumerate() {
            if day.name.trim().is_empty() {
                return Err(Error::field(format!("days[{}].name", di), "must not be empty"));
            }

            ensure_unique_orders(
                &format!("day '{}'", day.name),
                day.exercises.iter().map(|e| e.order),
            )?;

            for (ei, exercise) in day.exercises.iter().enumerate() {
                exercise.validate(&format!("days[{}].exercises[{}]", di, ei))?;
            }
        }

        Ok(())
    }
}

impl NewPlanExercise {
    fn validate(&self, path: &str) -> Result<()> {
        if self.exercise_id.is_empty() {
            return Err(Error::field(
                format!("{}.exerciseId", path),
                "must not be empty",
            ));
        }
        if self.sets <= 0 {
            return Err(Error::field(format!("{}.sets", path), "must be positive"));
        }
        if let Some(rpe) = self.rpe {
            if !(0..=10).contains(&rpe) {
                return Err(Error::field(
                    format!("{}.rpe", path),
                    "must be between 0 and 10",
                ));
            }
        }
        if matches!(self.rest_seconds, Some(s) if s < 0) {
            return Err(Error::field(
                format!("{}.restSeconds", path),
                "must not be negative",
            ));
        }
        if let Some(reps) = &self.reps {
            series::validate(reps)?;
        }
        Ok(())
    }
}

fn ensure_unique_orders(parent: &str, orders: impl Iterator<Item = i32>) -> Result<()> {
    let mut seen = HashSet::new();
    for order in orders {
        if !seen.insert(order) {
            return Err(Error::DuplicateOrder {
                parent: parent.to_string(),
                order,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_exercise(id: &str, order: i32) -> PlanExercise {
        PlanExercise {
            id: id.into(),
            exercise_id: format!("ex-{}", id),
            series_spec_type: SeriesSpecType::Reps,
            sets: 3,
            reps: Some("3x10".into()),
            rpe: None,
            rest_seconds: Some(90),
            order,
            exercise: None,
        }
    }

    fn new_exercise(order: i32) -> NewPlanExercise {
        NewPlanExercise {
            exercise_id: "ex-1".into(),
            series_spec_type: SeriesSpecType::Reps,
            sets: 3,
            reps: Some("3x10".into()),
            rpe: Some(8),
            rest_seconds: Some(60),
            order,
        }
    }

    #[test]
    fn sort_days_and_exercises() {
        let plan = Plan {
            id: "plan-1".into(),
            coach_id: None,
            title: "Strength".into(),
            description: None,
            days: vec![
                Day {
                    id: "d2".into(),
                    name: "Pull".into(),
                    order: 2,
                    exercises: vec![plan_exercise("b", 2), plan_exercise("a", 1)],
                },
                Day {
                    id: "d1".into(),
                    name: "Push".into(),
                    order: 1,
                    exercises: vec![],
                },
            ],
        }
        .sorted();

        let day_orders: Vec<_> = plan.days.iter().map(|d| d.order).collect();
        assert_eq!(day_orders, vec![1, 2]);
        let ex_ids: Vec<_> = plan.days[1].exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ex_ids, vec!["a", "b"]);
    }

    #[test]
    fn validate_accepts_well_formed_plan() {
        let plan = NewPlan {
            title: "Hypertrophy".into(),
            description: Some("8 weeks".into()),
            days: vec![
                NewDay {
                    name: "Legs".into(),
                    order: 2,
                    exercises: vec![new_exercise(1), new_exercise(2)],
                },
                NewDay {
                    name: "Arms".into(),
                    order: 1,
                    exercises: vec![],
                },
            ],
        };

        assert!(plan.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_day_order() {
        let plan = NewPlan {
            title: "Dup".into(),
            description: None,
            days: vec![
                NewDay {
                    name: "A".into(),
                    order: 1,
                    exercises: vec![],
                },
                NewDay {
                    name: "B".into(),
                    order: 1,
                    exercises: vec![],
                },
            ],
        };

        assert_eq!(
            plan.validate(),
            Err(Error::DuplicateOrder {
                parent: "plan".into(),
                order: 1
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_exercise_order() {
        let plan = NewPlan {
            title: "Dup".into(),
            description: None,
            days: vec![NewDay {
                name: "A".into(),
                order: 1,
                exercises: vec![new_exercise(3), new_exercise(3)],
            }],
        };

        assert!(matches!(
            plan.validate(),
            Err(Error::DuplicateOrder { order: 3, .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_sets() {
        let mut exercise = new_exercise(1);
        exercise.sets = 0;
        let plan = NewPlan {
            title: "Bad".into(),
            description: None,
            days: vec![NewDay {
                name: "A".into(),
                order: 1,
                exercises: vec![exercise],
            }],
        };

        assert!(matches!(
            plan.validate(),
            Err(Error::InvalidField { ref field, .. }) if field == "days[0].exercises[0].sets"
        ));
    }

    #[test]
    fn validate_rejects_bad_series_spec() {
        let mut exercise = new_exercise(1);
        exercise.reps = Some("lots".into());
        let plan = NewPlan {
            title: "Bad".into(),
            description: None,
            days: vec![NewDay {
                name: "A".into(),
                order: 1,
                exercises: vec![exercise],
            }],
        };

        assert!(matches!(plan.validate(), Err(Error::InvalidSeriesSpec(_))));
    }

    #[test]
    fn validate_rejects_oversized_set_count() {
        let mut exercise = new_exercise(1);
        exercise.reps = Some("4000000000x10".into());
        let plan = NewPlan {
            title: "Huge".into(),
            description: None,
            days: vec![NewDay {
                name: "A".into(),
                order: 1,
                exercises: vec![exercise],
            }],
        };

        assert!(matches!(plan.validate(), Err(Error::InvalidSeriesSpec(_))));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let plan = NewPlan {
            title: "   ".into(),
            description: None,
            days: vec![],
        };
        assert!(plan.validate().is_err());
    }
}
