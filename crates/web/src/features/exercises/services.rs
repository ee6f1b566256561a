use sqlx::PgPool;
use storage::{
    dto::exercise::{CreateExerciseRequest, ExerciseFilter},
    error::{Result, StorageError},
    models::Exercise,
    repository::exercise::ExerciseRepository,
};
use uuid::Uuid;

/// Catalog exercises plus the user's custom ones
pub async fn list_exercises(
    pool: &PgPool,
    user_id: Uuid,
    filter: &ExerciseFilter,
) -> Result<Vec<Exercise>> {
    let repo = ExerciseRepository::new(pool);
    repo.list_visible(user_id, filter).await
}

/// Fetch an exercise, enforcing custom-exercise ownership
pub async fn get_exercise(pool: &PgPool, user_id: Uuid, exercise_id: Uuid) -> Result<Exercise> {
    let repo = ExerciseRepository::new(pool);
    let exercise = repo.find_by_id(exercise_id).await?;
    exercise.ensure_visible_to(user_id)?;
    Ok(exercise)
}

/// Checks that every referenced exercise exists and is visible to the user.
pub async fn ensure_all_visible(pool: &PgPool, user_id: Uuid, exercise_ids: &[Uuid]) -> Result<()> {
    let repo = ExerciseRepository::new(pool);
    let found = repo.find_by_ids(exercise_ids).await?;

    for id in exercise_ids {
        let exercise = found
            .iter()
            .find(|e| e.exercise_id == *id)
            .ok_or(StorageError::NotFound)?;
        exercise.ensure_visible_to(user_id)?;
    }

    Ok(())
}

pub async fn create_custom_exercise(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateExerciseRequest,
) -> Result<Exercise> {
    let repo = ExerciseRepository::new(pool);
    repo.create_custom(user_id, request).await
}
