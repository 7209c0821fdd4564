//! User accounts.

use super::rows::UserRow;
use crate::auth::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// Look up a user by login email.
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, role, password_hash, coach_id
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Check whether a user exists with the given role.
pub async fn user_has_role(pool: &PgPool, user_id: &str, role: Role) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)")
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
}

/// Fields for a new account. The password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub coach_id: Option<&'a str>,
}

/// Insert a user. A taken email surfaces as a unique violation.
pub async fn insert_user(pool: &PgPool, user: NewUser<'_>) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, name, password_hash, role, coach_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, name, role, password_hash, coach_id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user.email)
    .bind(user.name)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(user.coach_id)
    .fetch_one(pool)
    .await
}
