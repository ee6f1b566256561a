use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::split::CreateSplitRequest;
use crate::error::{Result, StorageError};
use crate::models::{Split, merge_exercise_refs};

const SPLIT_COLUMNS: &str =
    "split_id, user_id, name, description, exercise_ids, created_at, updated_at";

pub struct SplitRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SplitRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// User's splits, most recently updated first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Split>> {
        let splits = sqlx::query_as::<_, Split>(&format!(
            r#"
            SELECT {SPLIT_COLUMNS}
            FROM splits
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(splits)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Split> {
        let split = sqlx::query_as::<_, Split>(&format!(
            "SELECT {SPLIT_COLUMNS} FROM splits WHERE split_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(split)
    }

    pub async fn create(&self, user_id: Uuid, req: &CreateSplitRequest) -> Result<Split> {
        let exercise_ids = merge_exercise_refs(&[], &req.exercise_ids);
        let description = req
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let split = sqlx::query_as::<_, Split>(&format!(
            r#"
            INSERT INTO splits (user_id, name, description, exercise_ids)
            VALUES ($1, $2, $3, $4)
            RETURNING {SPLIT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(req.name.trim())
        .bind(description)
        .bind(&exercise_ids)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_domain("Split already exists"))?;

        Ok(split)
    }

    /// Adds exercise references with set semantics and bumps `updated_at`.
    ///
    /// The row is locked while merging so concurrent additions do not drop
    /// each other's references.
    pub async fn add_exercises(&self, split_id: Uuid, additions: &[Uuid]) -> Result<Split> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, Vec<Uuid>>(
            "SELECT exercise_ids FROM splits WHERE split_id = $1 FOR UPDATE",
        )
        .bind(split_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let merged = merge_exercise_refs(&current, additions);

        let split = sqlx::query_as::<_, Split>(&format!(
            r#"
            UPDATE splits
            SET exercise_ids = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE split_id = $1
            RETURNING {SPLIT_COLUMNS}
            "#
        ))
        .bind(split_id)
        .bind(&merged)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::insert_user;

    fn request(name: &str, exercise_ids: Vec<Uuid>) -> CreateSplitRequest {
        CreateSplitRequest {
            name: name.to_string(),
            description: None,
            exercise_ids,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_exercises_twice_keeps_one_reference(pool: PgPool) {
        let user = insert_user(&pool).await;
        let repo = SplitRepository::new(&pool);
        let (squat, deadlift) = (Uuid::new_v4(), Uuid::new_v4());

        let split = repo.create(user, &request("Leg Day", vec![squat])).await.unwrap();

        let once = repo.add_exercises(split.split_id, &[deadlift]).await.unwrap();
        let twice = repo.add_exercises(split.split_id, &[deadlift]).await.unwrap();

        assert_eq!(once.exercise_ids, vec![squat, deadlift]);
        assert_eq!(twice.exercise_ids, vec![squat, deadlift]);
        assert!(twice.updated_at >= once.updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_exercises_to_missing_split(pool: PgPool) {
        let result = SplitRepository::new(&pool)
            .add_exercises(Uuid::new_v4(), &[Uuid::new_v4()])
            .await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_name_is_stored_trimmed(pool: PgPool) {
        let user = insert_user(&pool).await;
        let repo = SplitRepository::new(&pool);

        let split = repo.create(user, &request("  Push  ", vec![])).await.unwrap();
        assert_eq!(split.name, "Push");

        let too_short = repo.create(user, &request("  ab  ", vec![])).await;
        assert!(matches!(too_short, Err(StorageError::Validation(_))));
    }
}
