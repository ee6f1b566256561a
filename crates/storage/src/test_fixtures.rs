//! Row builders for tests that run against a migrated database.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{LoggedSet, WeightUnit};

pub async fn insert_user(pool: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (external_id, display_name) VALUES ($1, 'Lifter') RETURNING user_id",
    )
    .bind(format!("user_{}", Uuid::new_v4().simple()))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_exercise(pool: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO exercises (name, is_custom) VALUES ($1, FALSE) RETURNING exercise_id",
    )
    .bind(format!("Bench Press {}", Uuid::new_v4().simple()))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// A finished session holding one exercise row with `sets`.
pub async fn insert_completed_session(
    pool: &PgPool,
    user_id: Uuid,
    exercise_id: Uuid,
    completed_at: NaiveDateTime,
    sets: Vec<LoggedSet>,
) -> Uuid {
    let session_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO workout_sessions (user_id, started_at, completed_at, is_active)
        VALUES ($1, $2 - INTERVAL '1 hour', $2, FALSE)
        RETURNING session_id
        "#,
    )
    .bind(user_id)
    .bind(completed_at)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO exercise_sets (session_id, exercise_id, order_index, sets) VALUES ($1, $2, 0, $3)",
    )
    .bind(session_id)
    .bind(exercise_id)
    .bind(Json(sets))
    .execute(pool)
    .await
    .unwrap();

    session_id
}

pub fn kg_set(weight: i64, reps: i32) -> LoggedSet {
    LoggedSet {
        id: Uuid::new_v4(),
        reps,
        weight: Decimal::from(weight),
        unit: WeightUnit::Kg,
        is_body_weight: false,
        notes: None,
    }
}

pub fn at(day: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|d| d.and_hms_opt(18, 0, 0))
        .unwrap()
}
