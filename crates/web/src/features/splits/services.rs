use sqlx::PgPool;
use storage::{
    dto::split::{AddSplitExercisesRequest, CreateSplitRequest},
    error::Result,
    models::Split,
    repository::split::SplitRepository,
};
use uuid::Uuid;

use crate::features::exercises::services::ensure_all_visible;

/// User's splits, most recently updated first
pub async fn list_splits(pool: &PgPool, user_id: Uuid) -> Result<Vec<Split>> {
    let repo = SplitRepository::new(pool);
    repo.list_for_user(user_id).await
}

/// Fetch a split owned by the user
pub async fn get_split(pool: &PgPool, user_id: Uuid, split_id: Uuid) -> Result<Split> {
    let repo = SplitRepository::new(pool);
    let split = repo.find_by_id(split_id).await?;
    split.ensure_owned_by(user_id)?;
    Ok(split)
}

pub async fn create_split(pool: &PgPool, user_id: Uuid, request: &CreateSplitRequest) -> Result<Split> {
    if !request.exercise_ids.is_empty() {
        ensure_all_visible(pool, user_id, &request.exercise_ids).await?;
    }

    let repo = SplitRepository::new(pool);
    let split = repo.create(user_id, request).await?;

    tracing::info!(split_id = %split.split_id, "Split created");

    Ok(split)
}

/// Add exercise references with set semantics
pub async fn add_exercises(
    pool: &PgPool,
    user_id: Uuid,
    split_id: Uuid,
    request: &AddSplitExercisesRequest,
) -> Result<Split> {
    get_split(pool, user_id, split_id).await?;
    ensure_all_visible(pool, user_id, &request.exercise_ids).await?;

    let repo = SplitRepository::new(pool);
    repo.add_exercises(split_id, &request.exercise_ids).await
}
