//! Plan management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ptsync_engine::{NewPlan, Plan};

use crate::auth::{AuthUser, CoachUser};
use crate::error::Result;
use crate::handlers::{assign_plan, create_plan, get_plan, AssignPlanRequest, AssignmentResponse};
use crate::AppState;

/// Create plan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", post(create_handler))
        .route("/plans/{id}", get(get_handler))
        .route("/plans/{id}/assign", post(assign_handler))
}

/// POST /plans
async fn create_handler(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Json(plan): Json<NewPlan>,
) -> Result<(StatusCode, Json<Plan>)> {
    let plan = create_plan(&state.pool, &coach.user_id, plan).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /plans/{id}
async fn get_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Result<Json<Plan>> {
    Ok(Json(get_plan(&state.pool, &user, &plan_id).await?))
}

/// POST /plans/{id}/assign
async fn assign_handler(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(plan_id): Path<String>,
    Json(request): Json<AssignPlanRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>)> {
    let assignment = assign_plan(&state.pool, &coach.user_id, &plan_id, request).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}
