use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::workout::CompleteWorkoutResponse;
use crate::error::Result;
use crate::repository::workout::WorkoutRepository;
use crate::services::performance;

/// Completes a session and folds its sets into the user's performance
/// records. Both happen in one transaction.
pub async fn complete_workout(
    pool: &PgPool,
    session_id: Uuid,
    notes: Option<&str>,
) -> Result<CompleteWorkoutResponse> {
    let repo = WorkoutRepository::new(pool);
    let mut tx = pool.begin().await?;

    let notes = notes.map(str::trim).filter(|n| !n.is_empty());
    let workout = repo.mark_completed(session_id, notes, &mut tx).await?;
    let personal_bests = performance::aggregate_session(session_id, &mut tx).await?;

    tx.commit().await?;

    info!(
        session_id = %session_id,
        personal_bests = personal_bests.len(),
        "Workout completed"
    );

    Ok(CompleteWorkoutResponse {
        workout,
        personal_bests,
    })
}
