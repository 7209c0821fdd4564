//! Account handlers - registration and login.

use crate::auth::{hash_password, issue_token, verify_password, Role};
use crate::config::Config;
use crate::db::{self, NewUser, UserRow};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Students register themselves, optionally under a coach.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub coach_id: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if !is_plausible_email(&self.email) {
            return Err(AppError::BadRequest("A valid email is required".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            coach_id: row.coach_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(' '),
        None => false,
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a student account.
pub async fn register(pool: &PgPool, request: RegisterRequest) -> Result<UserProfile> {
    request.validate()?;
    let email = normalize_email(&request.email);

    if let Some(coach_id) = request.coach_id.as_deref() {
        if !db::user_has_role(pool, coach_id, Role::Coach).await? {
            return Err(AppError::BadRequest("Unknown coach".into()));
        }
    }

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

    let user = db::insert_user(
        pool,
        NewUser {
            email: &email,
            name: request.name.trim(),
            password_hash: &password_hash,
            role: Role::Student,
            coach_id: request.coach_id.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            AppError::Conflict("Email already exists".into())
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(user.into())
}

/// Check credentials and issue an access token.
///
/// Unknown emails and wrong passwords get the same answer.
pub async fn login(pool: &PgPool, config: &Config, request: LoginRequest) -> Result<LoginResponse> {
    let invalid = || AppError::Unauthorized("invalid credentials".into());
    let email = normalize_email(&request.email);

    let Some(user) = db::find_user_by_email(pool, &email).await? else {
        tracing::warn!("Login failed: unknown email");
        return Err(invalid());
    };

    let stored = user.password_hash.clone();
    let password = request.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(format!("stored password hash unreadable: {}", e)))?;

    if !verified {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let access_token = issue_token(&user.id, user.role, &config.jwt_secret, config.jwt_ttl_seconds)
        .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");
    Ok(LoginResponse {
        access_token,
        user: user.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_request(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            coach_id: None,
        }
    }

    #[test]
    fn registration_is_validated() {
        assert!(register_request("ana@example.com", "secret1", "Ana").validate().is_ok());

        for (email, password, name) in [
            ("not-an-email", "secret1", "Ana"),
            ("@example.com", "secret1", "Ana"),
            ("ana@example.com", "short", "Ana"),
            ("ana@example.com", "secret1", "  "),
        ] {
            assert!(
                matches!(
                    register_request(email, password, name).validate(),
                    Err(AppError::BadRequest(_))
                ),
                "expected ({}, {}, {}) to be rejected",
                email,
                password,
                name
            );
        }
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn register_request_from_json() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "email": "ana@example.com",
            "password": "secret1",
            "name": "Ana",
            "coachId": "coach-1"
        }))
        .unwrap();
        assert_eq!(request.coach_id.as_deref(), Some("coach-1"));
    }

    #[test]
    fn login_response_shape() {
        let response = LoginResponse {
            access_token: "t".into(),
            user: UserProfile {
                id: "u1".into(),
                email: "ana@example.com".into(),
                name: "Ana".into(),
                role: Role::Student,
                coach_id: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "access_token": "t",
                "user": {"id": "u1", "email": "ana@example.com", "name": "Ana", "role": "student"}
            })
        );
    }
}
