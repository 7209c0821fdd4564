//! Push handler - applies queued client mutations.

use crate::db::{LoggedWorkout, SyncRepository, WorkoutWrite};
use crate::error::{AppError, Result};
use ptsync_engine::{Mutation, MutationIntent, PushRequest, PushResponse};

/// Process a push request from a student.
///
/// Every mutation is applied on its own: one bad payload or failed write
/// never affects the others. Each input id ends up in exactly one of
/// `processedIds` or `failedIds`.
pub async fn handle_push(
    repo: &dyn SyncRepository,
    student_id: &str,
    request: PushRequest,
) -> PushResponse {
    let mut response = PushResponse::default();

    for mutation in &request.mutations {
        match apply_mutation(repo, student_id, mutation).await {
            Ok(WorkoutWrite::Inserted {
                workout_log_id,
                sets,
            }) => {
                tracing::debug!(
                    mutation_id = %mutation.id,
                    workout_log_id = %workout_log_id,
                    sets,
                    "Workout logged"
                );
                response.processed(mutation.id.clone());
            }
            Ok(WorkoutWrite::AlreadyProcessed) => {
                tracing::debug!(mutation_id = %mutation.id, "Mutation already applied");
                response.processed(mutation.id.clone());
            }
            Err(AppError::Database(e)) => {
                tracing::error!(mutation_id = %mutation.id, "Failed to apply mutation: {:?}", e);
                response.failed(mutation.id.clone());
            }
            Err(e) => {
                tracing::warn!(mutation_id = %mutation.id, kind = %mutation.kind, "Rejected mutation: {}", e);
                response.failed(mutation.id.clone());
            }
        }
    }

    tracing::info!(
        student_id,
        processed = response.processed_ids.len(),
        failed = response.failed_ids.len(),
        "Push processed"
    );

    response
}

async fn apply_mutation(
    repo: &dyn SyncRepository,
    student_id: &str,
    mutation: &Mutation,
) -> Result<WorkoutWrite> {
    match mutation.decode()? {
        MutationIntent::LogWorkout(payload) => {
            let plan_id = payload.plan_id.clone();
            let day_id = payload.day_id.clone();
            let draft = payload.into_draft(mutation.timestamp)?;

            let workout = LoggedWorkout {
                mutation_id: mutation.id.clone(),
                plan_id,
                day_id,
                draft,
            };
            Ok(repo.record_workout(student_id, &workout).await?)
        }
    }
}
