//! Authentication: bearer JWTs and role-checked extractors.

mod jwt;
mod middleware;
mod password;

pub use jwt::{issue_token, Role};
pub use password::{hash_password, verify_password};
pub use middleware::{AuthUser, CoachUser, StudentUser};
