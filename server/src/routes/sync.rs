//! Sync endpoint routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use ptsync_engine::{BootstrapSnapshot, PushRequest, PushResponse};

use crate::auth::StudentUser;
use crate::error::Result;
use crate::handlers::{handle_bootstrap, handle_push};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync/bootstrap", get(bootstrap_handler))
        .route("/sync/push", post(push_handler))
}

/// GET /sync/bootstrap - Full snapshot for the authenticated student.
async fn bootstrap_handler(
    State(state): State<AppState>,
    StudentUser(user): StudentUser,
) -> Result<Json<BootstrapSnapshot>> {
    let snapshot = handle_bootstrap(
        state.sync.as_ref(),
        &user.user_id,
        state.config.bootstrap_window_days,
    )
    .await?;
    Ok(Json(snapshot))
}

/// POST /sync/push - Apply queued mutations.
async fn push_handler(
    State(state): State<AppState>,
    StudentUser(user): StudentUser,
    Json(request): Json<PushRequest>,
) -> Json<PushResponse> {
    Json(handle_push(state.sync.as_ref(), &user.user_id, request).await)
}
