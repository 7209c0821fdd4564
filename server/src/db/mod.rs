//! Database module for PostgreSQL persistence.

mod exercises;
mod plans;
mod pool;
mod repository;
mod rows;
mod users;
mod workouts;

pub use exercises::*;
pub use plans::*;
pub use pool::*;
#[cfg(test)]
pub(crate) use repository::memory::MemoryRepository;
pub use repository::{PgSyncRepository, SyncRepository};
pub use rows::UserRow;
pub use users::*;
pub use workouts::*;
