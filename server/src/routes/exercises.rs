//! Exercise catalog routes.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ptsync_engine::{Exercise, NewExercise};

use crate::auth::{AuthUser, CoachUser, Role};
use crate::error::{AppError, Result};
use crate::handlers::{create_exercise, list_exercises};
use crate::AppState;

/// Create exercise routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/exercises", get(list_handler).post(create_handler))
}

/// GET /exercises
async fn list_handler(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<Exercise>>> {
    if user.role == Role::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(Json(list_exercises(&state.pool, &user.user_id).await?))
}

/// POST /exercises
async fn create_handler(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Json(exercise): Json<NewExercise>,
) -> Result<(StatusCode, Json<Exercise>)> {
    let exercise = create_exercise(&state.pool, &coach.user_id, exercise).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}
