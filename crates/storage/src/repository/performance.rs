use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::performance::ExerciseHistoryEntry;
use crate::error::{Result, StorageError};
use crate::models::ExercisePerformance;

const PERFORMANCE_COLUMNS: &str = r#"
    performance_id, user_id, exercise_id,
    last_weight, last_reps, last_unit, last_date, last_set_count,
    pb_weight, pb_reps, pb_unit, pb_date,
    total_workouts, updated_at
"#;

pub struct PerformanceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PerformanceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: Uuid, exercise_id: Uuid) -> Result<ExercisePerformance> {
        let performance = sqlx::query_as::<_, ExercisePerformance>(&format!(
            r#"
            SELECT {PERFORMANCE_COLUMNS}
            FROM exercise_performances
            WHERE user_id = $1 AND exercise_id = $2
            "#
        ))
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(performance)
    }

    /// All of a user's performance records, most recently updated first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ExercisePerformance>> {
        let performances = sqlx::query_as::<_, ExercisePerformance>(&format!(
            r#"
            SELECT {PERFORMANCE_COLUMNS}
            FROM exercise_performances
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(performances)
    }

    /// Completed sessions that logged the exercise, newest first
    pub async fn exercise_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<ExerciseHistoryEntry>, i64)> {
        let entries = sqlx::query_as::<_, ExerciseHistoryEntry>(
            r#"
            SELECT ws.session_id, ws.started_at, ws.completed_at,
                   COALESCE(jsonb_agg(s.value ORDER BY es.order_index, s.ordinality), '[]'::jsonb) AS sets
            FROM workout_sessions ws
            JOIN exercise_sets es ON es.session_id = ws.session_id
            CROSS JOIN LATERAL jsonb_array_elements(es.sets) WITH ORDINALITY AS s(value, ordinality)
            WHERE ws.user_id = $1
              AND es.exercise_id = $2
              AND ws.completed_at IS NOT NULL
            GROUP BY ws.session_id
            ORDER BY ws.completed_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT ws.session_id)
            FROM workout_sessions ws
            JOIN exercise_sets es ON es.session_id = ws.session_id
            WHERE ws.user_id = $1
              AND es.exercise_id = $2
              AND ws.completed_at IS NOT NULL
              AND jsonb_array_length(es.sets) > 0
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_one(self.pool)
        .await?;

        Ok((entries, total))
    }
}
