//! Account routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::Result;
use crate::handlers::{login, register, LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use crate::AppState;

/// Create account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// POST /auth/register
async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let user = register(&state.pool, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(login(&state.pool, &state.config, request).await?))
}
