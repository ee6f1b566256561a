use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::exercise::{CreateExerciseRequest, ExerciseFilter};
use crate::error::{Result, StorageError};
use crate::models::Exercise;

const EXERCISE_COLUMNS: &str =
    "exercise_id, name, muscle_groups, equipment, is_custom, owner_user_id, created_at";

pub struct ExerciseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExerciseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE exercise_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE exercise_id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }

    /// Catalog exercises plus the user's own custom ones, sorted by name
    pub async fn list_visible(&self, user_id: Uuid, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        let muscle_group = filter
            .muscle_group
            .as_deref()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty());
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")));

        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            SELECT {EXERCISE_COLUMNS}
            FROM exercises
            WHERE (NOT is_custom OR owner_user_id = $1)
              AND ($2::text IS NULL OR $2 = ANY(muscle_groups))
              AND ($3::text IS NULL OR name ILIKE $3)
            ORDER BY lower(name)
            "#
        ))
        .bind(user_id)
        .bind(muscle_group)
        .bind(search)
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn create_custom(&self, owner: Uuid, req: &CreateExerciseRequest) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            INSERT INTO exercises (name, muscle_groups, equipment, is_custom, owner_user_id)
            VALUES ($1, $2, $3, TRUE, $4)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(req.normalized_muscle_groups())
        .bind(&req.equipment)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(exercise)
    }

    /// Insert or refresh a catalog exercise, matched case-insensitively by name.
    /// Returns true when a new row was created.
    pub async fn upsert_catalog(
        &self,
        name: &str,
        muscle_groups: &[String],
        equipment: Option<&str>,
    ) -> Result<bool> {
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO exercises (name, muscle_groups, equipment, is_custom)
            VALUES ($1, $2, $3, FALSE)
            ON CONFLICT (lower(name)) WHERE NOT is_custom
            DO UPDATE SET
                muscle_groups = EXCLUDED.muscle_groups,
                equipment = EXCLUDED.equipment
            RETURNING (xmax = 0)
            "#,
        )
        .bind(name)
        .bind(muscle_groups)
        .bind(equipment)
        .fetch_one(self.pool)
        .await?;

        Ok(inserted)
    }
}
