//! Authentication extractors.
//!
//! Every protected route takes one of these. The user id always comes from
//! the verified token, never from the request body.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::jwt::{verify_token, Role};
use crate::error::AppError;
use crate::AppState;

/// Authenticated user extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("invalid authorization header format".into()))?;

        let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Unauthorized("invalid or expired token".into())
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// An authenticated user with the student role.
#[derive(Debug, Clone)]
pub struct StudentUser(pub AuthUser);

impl FromRequestParts<AppState> for StudentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Student => Ok(StudentUser(user)),
            _ => Err(AppError::Forbidden),
        }
    }
}

/// An authenticated user with the coach role.
#[derive(Debug, Clone)]
pub struct CoachUser(pub AuthUser);

impl FromRequestParts<AppState> for CoachUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Coach => Ok(CoachUser(user)),
            _ => Err(AppError::Forbidden),
        }
    }
}
