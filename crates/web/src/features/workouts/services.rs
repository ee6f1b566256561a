use sqlx::PgPool;
use storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        workout::{
            CompleteWorkoutResponse, LogSetRequest, WorkoutDetailResponse, WorkoutSummary,
        },
    },
    error::{Result, StorageError},
    models::{ExerciseSet, User, WorkoutSession},
    repository::{split::SplitRepository, workout::WorkoutRepository},
    services::workout as workout_service,
};
use uuid::Uuid;

use crate::features::exercises::services::{ensure_all_visible, get_exercise};

/// Load a session and check the user owns it
pub async fn owned_session(pool: &PgPool, user_id: Uuid, session_id: Uuid) -> Result<WorkoutSession> {
    let repo = WorkoutRepository::new(pool);
    let session = repo.find_by_id(session_id).await?;
    session.ensure_owned_by(user_id)?;
    Ok(session)
}

/// Start a session, optionally seeded with a split's exercises.
///
/// A user has at most one active session.
pub async fn start_workout(
    pool: &PgPool,
    user_id: Uuid,
    split_id: Option<Uuid>,
) -> Result<WorkoutDetailResponse> {
    let repo = WorkoutRepository::new(pool);

    if repo.find_active_for_user(user_id).await?.is_some() {
        return Err(StorageError::Conflict(
            "A workout is already in progress".to_string(),
        ));
    }

    let exercise_ids = match split_id {
        Some(id) => {
            let split = SplitRepository::new(pool).find_by_id(id).await?;
            split.ensure_owned_by(user_id)?;
            ensure_all_visible(pool, user_id, &split.exercise_ids).await?;
            split.exercise_ids
        }
        None => Vec::new(),
    };

    let session = repo.start(user_id, split_id, &exercise_ids).await?;
    let exercises = repo.exercise_sets(session.session_id).await?;

    tracing::info!(
        session_id = %session.session_id,
        exercises = exercises.len(),
        "Workout started"
    );

    Ok(WorkoutDetailResponse::new(session, exercises))
}

pub async fn get_workout(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<WorkoutDetailResponse> {
    let session = owned_session(pool, user_id, session_id).await?;
    let exercises = WorkoutRepository::new(pool).exercise_sets(session_id).await?;
    Ok(WorkoutDetailResponse::new(session, exercises))
}

pub async fn get_active_workout(pool: &PgPool, user_id: Uuid) -> Result<WorkoutDetailResponse> {
    let repo = WorkoutRepository::new(pool);
    let session = repo
        .find_active_for_user(user_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    let exercises = repo.exercise_sets(session.session_id).await?;
    Ok(WorkoutDetailResponse::new(session, exercises))
}

pub async fn list_workouts(
    pool: &PgPool,
    user_id: Uuid,
    pagination: PaginationParams,
) -> Result<PaginatedResponse<WorkoutSummary>> {
    let repo = WorkoutRepository::new(pool);
    let (sessions, total) = repo.list_for_user(user_id, &pagination).await?;
    Ok(PaginatedResponse::new(sessions, pagination, total))
}

pub async fn add_exercise(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    exercise_id: Uuid,
) -> Result<ExerciseSet> {
    owned_session(pool, user_id, session_id).await?;
    get_exercise(pool, user_id, exercise_id).await?;

    WorkoutRepository::new(pool)
        .add_exercise_set(session_id, exercise_id)
        .await
}

pub async fn remove_exercise(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    exercise_set_id: Uuid,
) -> Result<()> {
    owned_session(pool, user_id, session_id).await?;

    WorkoutRepository::new(pool)
        .remove_exercise_set(session_id, exercise_set_id)
        .await
}

pub async fn set_exercise_active(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    exercise_set_id: Uuid,
    is_active: bool,
) -> Result<ExerciseSet> {
    owned_session(pool, user_id, session_id).await?;

    WorkoutRepository::new(pool)
        .set_exercise_active(session_id, exercise_set_id, is_active)
        .await
}

/// Append a set; the unit defaults to the user's preference
pub async fn log_set(
    pool: &PgPool,
    user: &User,
    session_id: Uuid,
    exercise_set_id: Uuid,
    request: LogSetRequest,
) -> Result<ExerciseSet> {
    owned_session(pool, user.user_id, session_id).await?;

    let set = request.into_logged_set(user.weight_unit);
    WorkoutRepository::new(pool)
        .append_set(session_id, exercise_set_id, &set)
        .await
}

pub async fn delete_set(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    exercise_set_id: Uuid,
    set_id: Uuid,
) -> Result<ExerciseSet> {
    owned_session(pool, user_id, session_id).await?;

    WorkoutRepository::new(pool)
        .remove_set(session_id, exercise_set_id, set_id)
        .await
}

pub async fn complete_workout(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    notes: Option<&str>,
) -> Result<CompleteWorkoutResponse> {
    let session = owned_session(pool, user_id, session_id).await?;
    if session.is_completed() {
        return Err(StorageError::Conflict(
            "Workout is already completed".to_string(),
        ));
    }

    workout_service::complete_workout(pool, session_id, notes).await
}

pub async fn delete_workout(pool: &PgPool, user_id: Uuid, session_id: Uuid) -> Result<()> {
    owned_session(pool, user_id, session_id).await?;

    WorkoutRepository::new(pool).delete(session_id).await?;

    tracing::info!(session_id = %session_id, "Workout deleted");

    Ok(())
}
