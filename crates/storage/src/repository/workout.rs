use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::workout::{ExerciseSetDetail, WorkoutSummary};
use crate::error::{Result, StorageError};
use crate::models::{ExerciseSet, LoggedSet, WorkoutSession};

const SESSION_COLUMNS: &str =
    "session_id, user_id, split_id, started_at, completed_at, notes, is_active";

const EXERCISE_SET_COLUMNS: &str =
    "exercise_set_id, session_id, exercise_id, order_index, is_active, sets, created_at";

pub struct WorkoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkoutRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, session_id: Uuid) -> Result<WorkoutSession> {
        let session = sqlx::query_as::<_, WorkoutSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(session)
    }

    pub async fn find_active_for_user(&self, user_id: Uuid) -> Result<Option<WorkoutSession>> {
        let session = sqlx::query_as::<_, WorkoutSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE user_id = $1 AND is_active"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// Session history, newest first, with the total count for pagination
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<WorkoutSummary>, i64)> {
        let sessions = sqlx::query_as::<_, WorkoutSummary>(
            r#"
            SELECT
                ws.session_id,
                ws.split_id,
                s.name AS split_name,
                ws.started_at,
                ws.completed_at,
                ws.is_active,
                COUNT(es.exercise_set_id) AS exercise_count,
                COALESCE(SUM(jsonb_array_length(es.sets)), 0)::bigint AS set_count
            FROM workout_sessions ws
            LEFT JOIN splits s ON s.split_id = ws.split_id
            LEFT JOIN exercise_sets es ON es.session_id = ws.session_id
            WHERE ws.user_id = $1
            GROUP BY ws.session_id, s.name
            ORDER BY ws.started_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok((sessions, total))
    }

    /// Starts a session, seeding one exercise set per entry of `exercise_ids`
    /// in the given order.
    pub async fn start(
        &self,
        user_id: Uuid,
        split_id: Option<Uuid>,
        exercise_ids: &[Uuid],
    ) -> Result<WorkoutSession> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, WorkoutSession>(&format!(
            r#"
            INSERT INTO workout_sessions (user_id, split_id)
            VALUES ($1, $2)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(split_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).into_domain("A workout is already in progress"))?;

        if !exercise_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO exercise_sets (session_id, exercise_id, order_index)
                SELECT $1, exercise_id, (ordinality - 1)::int
                FROM unnest($2::uuid[]) WITH ORDINALITY AS t(exercise_id, ordinality)
                "#,
            )
            .bind(session.session_id)
            .bind(exercise_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(session)
    }

    /// Exercise sets of a session with exercise names, in session order
    pub async fn exercise_sets(&self, session_id: Uuid) -> Result<Vec<ExerciseSetDetail>> {
        let sets = sqlx::query_as::<_, ExerciseSetDetail>(
            r#"
            SELECT es.exercise_set_id, es.exercise_id, e.name AS exercise_name,
                   es.order_index, es.is_active, es.sets
            FROM exercise_sets es
            JOIN exercises e ON e.exercise_id = es.exercise_id
            WHERE es.session_id = $1
            ORDER BY es.order_index
            "#,
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sets)
    }

    pub async fn add_exercise_set(&self, session_id: Uuid, exercise_id: Uuid) -> Result<ExerciseSet> {
        let exercise_set = sqlx::query_as::<_, ExerciseSet>(&format!(
            r#"
            INSERT INTO exercise_sets (session_id, exercise_id, order_index)
            SELECT $1, $2, COALESCE(MAX(order_index) + 1, 0)
            FROM exercise_sets
            WHERE session_id = $1
            RETURNING {EXERCISE_SET_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(exercise_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exercise_set)
    }

    pub async fn remove_exercise_set(&self, session_id: Uuid, exercise_set_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM exercise_sets WHERE session_id = $1 AND exercise_set_id = $2",
        )
        .bind(session_id)
        .bind(exercise_set_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Appends one logged set to the end of the list.
    pub async fn append_set(
        &self,
        session_id: Uuid,
        exercise_set_id: Uuid,
        set: &LoggedSet,
    ) -> Result<ExerciseSet> {
        let exercise_set = sqlx::query_as::<_, ExerciseSet>(&format!(
            r#"
            UPDATE exercise_sets
            SET sets = sets || $3
            WHERE session_id = $1 AND exercise_set_id = $2
            RETURNING {EXERCISE_SET_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(exercise_set_id)
        .bind(Json([set]))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise_set)
    }

    /// Removes a logged set by id, keeping the order of the rest.
    pub async fn remove_set(
        &self,
        session_id: Uuid,
        exercise_set_id: Uuid,
        set_id: Uuid,
    ) -> Result<ExerciseSet> {
        let mut tx = self.pool.begin().await?;

        let Json(mut sets) = sqlx::query_scalar::<_, Json<Vec<LoggedSet>>>(
            r#"
            SELECT sets FROM exercise_sets
            WHERE session_id = $1 AND exercise_set_id = $2
            FOR UPDATE
            "#,
        )
        .bind(session_id)
        .bind(exercise_set_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let before = sets.len();
        sets.retain(|s| s.id != set_id);
        if sets.len() == before {
            return Err(StorageError::NotFound);
        }

        let exercise_set = sqlx::query_as::<_, ExerciseSet>(&format!(
            r#"
            UPDATE exercise_sets
            SET sets = $2
            WHERE exercise_set_id = $1
            RETURNING {EXERCISE_SET_COLUMNS}
            "#
        ))
        .bind(exercise_set_id)
        .bind(Json(&sets))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(exercise_set)
    }

    pub async fn set_exercise_active(
        &self,
        session_id: Uuid,
        exercise_set_id: Uuid,
        is_active: bool,
    ) -> Result<ExerciseSet> {
        let exercise_set = sqlx::query_as::<_, ExerciseSet>(&format!(
            r#"
            UPDATE exercise_sets
            SET is_active = $3
            WHERE session_id = $1 AND exercise_set_id = $2
            RETURNING {EXERCISE_SET_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(exercise_set_id)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise_set)
    }

    /// Marks a session completed inside the caller's transaction.
    /// Fails with a conflict if it was already completed.
    pub async fn mark_completed(
        &self,
        session_id: Uuid,
        notes: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<WorkoutSession> {
        let session = sqlx::query_as::<_, WorkoutSession>(&format!(
            r#"
            UPDATE workout_sessions
            SET completed_at = CURRENT_TIMESTAMP,
                notes = $2,
                is_active = FALSE
            WHERE session_id = $1 AND completed_at IS NULL
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(notes)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| StorageError::Conflict("Workout is already completed".to_string()))?;

        Ok(session)
    }

    pub async fn delete(&self, session_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM workout_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
