//! Plan handlers - coaches build plans and assign them to students.

use crate::auth::{AuthUser, Role};
use crate::db;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use ptsync_engine::{NewPlan, Plan};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Request body for assigning a plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPlanRequest {
    pub student_id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// A newly created assignment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: String,
    pub plan_id: String,
    pub student_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Validate and store a plan, returning it as stored.
pub async fn create_plan(pool: &PgPool, coach_id: &str, plan: NewPlan) -> Result<Plan> {
    plan.validate()?;

    let plan_id = db::insert_plan(pool, coach_id, &plan)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                AppError::BadRequest("Plan references an unknown exercise".to_string())
            } else {
                e.into()
            }
        })?;

    tracing::info!(plan_id = %plan_id, coach_id, days = plan.days.len(), "Plan created");

    db::get_plan(pool, &plan_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("plan {} missing after insert", plan_id)))
}

/// Read a plan the user is allowed to see.
///
/// Coaches see their own plans, students see plans assigned to them.
/// Anything else looks like a missing plan.
pub async fn get_plan(pool: &PgPool, user: &AuthUser, plan_id: &str) -> Result<Plan> {
    let not_found = || AppError::NotFound("Plan not found".to_string());
    let plan = db::get_plan(pool, plan_id).await?.ok_or_else(not_found)?;

    let allowed = match user.role {
        Role::Admin => true,
        Role::Coach => plan.coach_id.as_deref() == Some(user.user_id.as_str()),
        Role::Student => db::is_assigned_to(pool, plan_id, &user.user_id).await?,
    };

    if allowed {
        Ok(plan)
    } else {
        Err(not_found())
    }
}

/// Assign one of the coach's plans to one of the coach's students.
pub async fn assign_plan(
    pool: &PgPool,
    coach_id: &str,
    plan_id: &str,
    request: AssignPlanRequest,
) -> Result<AssignmentResponse> {
    validate_assignment(&request)?;

    match db::plan_coach(pool, plan_id).await? {
        Some(owner) if owner == coach_id => {}
        _ => return Err(AppError::NotFound("Plan not found".to_string())),
    }

    if !db::is_student_of(pool, &request.student_id, coach_id).await? {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    let row = db::insert_assignment(
        pool,
        plan_id,
        &request.student_id,
        request.start_date,
        request.end_date,
    )
    .await?;

    tracing::info!(
        assignment_id = %row.id,
        plan_id,
        student_id = %row.student_id,
        "Plan assigned"
    );

    Ok(AssignmentResponse {
        id: row.id,
        plan_id: row.plan_id,
        student_id: row.student_id,
        start_date: row.start_date,
        end_date: row.end_date,
        is_active: row.is_active,
    })
}

fn validate_assignment(request: &AssignPlanRequest) -> Result<()> {
    if request.student_id.trim().is_empty() {
        return Err(AppError::BadRequest("studentId must not be empty".to_string()));
    }
    if matches!(request.end_date, Some(end) if end < request.start_date) {
        return Err(AppError::BadRequest(
            "endDate must not be before startDate".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(end_day: Option<u32>) -> AssignPlanRequest {
        AssignPlanRequest {
            student_id: "student-1".into(),
            start_date: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
            end_date: end_day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn assignment_dates_are_checked() {
        assert!(validate_assignment(&request(None)).is_ok());
        assert!(validate_assignment(&request(Some(20))).is_ok());
        assert!(matches!(
            validate_assignment(&request(Some(1))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn assign_request_from_json() {
        let request: AssignPlanRequest = serde_json::from_str(
            r#"{"studentId": "s-1", "startDate": "2024-03-10T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(request.student_id, "s-1");
        assert!(request.end_date.is_none());
    }
}
