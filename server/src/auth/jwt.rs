//! HS256 access tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
    Student,
}

impl Role {
    /// Value stored in `users.role`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "coach" => Ok(Role::Coach),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

pub fn verify_token(
    token: &str,
    secret: &str,
) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

pub fn issue_token(
    user_id: &str,
    role: Role,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        role,
        exp: now.saturating_add(ttl_seconds).max(0) as usize,
        iat: now.max(0) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
