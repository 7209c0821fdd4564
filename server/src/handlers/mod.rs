//! Request handlers for sync, plan, exercise and account operations.

mod auth;
mod bootstrap;
mod exercises;
mod plans;
mod push;

pub use auth::*;
pub use bootstrap::*;
pub use exercises::*;
pub use plans::*;
pub use push::*;
