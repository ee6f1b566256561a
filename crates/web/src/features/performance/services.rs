use sqlx::PgPool;
use storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        performance::ExerciseHistoryEntry,
    },
    error::Result,
    models::ExercisePerformance,
    repository::performance::PerformanceRepository,
};
use uuid::Uuid;

use crate::features::exercises::services::get_exercise;

pub async fn list_performances(pool: &PgPool, user_id: Uuid) -> Result<Vec<ExercisePerformance>> {
    let repo = PerformanceRepository::new(pool);
    repo.list_for_user(user_id).await
}

/// Last-performed snapshot and personal best for one exercise
pub async fn get_performance(
    pool: &PgPool,
    user_id: Uuid,
    exercise_id: Uuid,
) -> Result<ExercisePerformance> {
    get_exercise(pool, user_id, exercise_id).await?;

    let repo = PerformanceRepository::new(pool);
    repo.find(user_id, exercise_id).await
}

pub async fn exercise_history(
    pool: &PgPool,
    user_id: Uuid,
    exercise_id: Uuid,
    pagination: PaginationParams,
) -> Result<PaginatedResponse<ExerciseHistoryEntry>> {
    get_exercise(pool, user_id, exercise_id).await?;

    let repo = PerformanceRepository::new(pool);
    let (entries, total) = repo
        .exercise_history(user_id, exercise_id, &pagination)
        .await?;

    Ok(PaginatedResponse::new(entries, pagination, total))
}
