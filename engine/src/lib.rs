//! # ptsync Engine
//!
//! The offline sync core for ptsync, a coaching app where students log
//! workouts on a device that is often offline.
//!
//! This crate holds the data model and the state transitions of the sync
//! protocol. It has no IO: persistence and networking live in
//! `ptsync-client` (device side) and `ptsync-server` (endpoint side).
//!
//! ## Core Concepts
//!
//! ### Mutations
//!
//! A [`Mutation`] is a client-recorded intent (`{ id, type, timestamp, payload }`)
//! with a client-generated `id` that stays stable across retries and serves as
//! the idempotency key. Its typed form is [`MutationIntent`].
//!
//! ### Store
//!
//! The [`Store`] holds the pending mutation queue and the cached server
//! snapshot (assignments, plans, exercises, workout logs). The queue shrinks
//! only when a [`PushResponse`] acknowledges an id; bootstrap replaces the
//! caches by primary key and never touches the queue.
//!
//! ### Snapshots
//!
//! [`LocalSnapshot`] is the persisted form of the store, with format
//! versioning so upgrades keep existing rows.
//!
//! ## Quick Start
//!
//! ```rust
//! use ptsync_engine::{
//!     ExercisePayload, Mutation, MutationIntent, PushResponse, SetPayload, Store,
//!     WorkoutPayload,
//! };
//!
//! let intent = MutationIntent::LogWorkout(WorkoutPayload {
//!     plan_id: Some("plan-1".into()),
//!     day_id: Some("day-1".into()),
//!     duration_minutes: 45,
//!     feedback: None,
//!     timestamp: None,
//!     exercises: vec![ExercisePayload {
//!         exercise_id: "squat".into(),
//!         sets: vec![SetPayload { set_number: 1, reps: 5, weight: 100.0, rpe: 8 }],
//!     }],
//! });
//!
//! let mut store = Store::new();
//! store.enqueue(Mutation::new("m-1", &intent, 1706745600000).unwrap());
//!
//! let sent: Vec<_> = store.queued_mutations().into_iter().map(|m| m.id).collect();
//! let response = PushResponse { processed_ids: vec!["m-1".into()], failed_ids: vec![] };
//! let report = store.acknowledge(&sent, &response, 1706745601000, None);
//!
//! assert_eq!(report.removed, vec!["m-1".to_string()]);
//! assert_eq!(store.pending_count(), 0);
//! ```

pub mod error;
pub mod model;
pub mod mutation;
pub mod plan;
pub mod protocol;
pub mod series;
pub mod snapshot;
pub mod store;
pub mod workout;

// Re-export main types at crate root
pub use error::Error;
pub use model::{Assignment, Exercise, ExerciseLog, NewExercise, SeriesSpecType, WorkoutLog};
pub use mutation::{Mutation, MutationId, MutationIntent, MutationKind, PendingMutation};
pub use plan::{Day, NewDay, NewPlan, NewPlanExercise, Plan, PlanExercise};
pub use protocol::{referenced_exercises, BootstrapSnapshot, PushRequest, PushResponse};
pub use series::SetTarget;
pub use snapshot::{LocalSnapshot, LOCAL_FORMAT_VERSION};
pub use store::{AckReport, BootstrapStats, Store};
pub use workout::{ExercisePayload, SetDraft, SetPayload, WorkoutLogDraft, WorkoutPayload};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
/// Version of the persisted local state layout.
pub type FormatVersion = u32;
