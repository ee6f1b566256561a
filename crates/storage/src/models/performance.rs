use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::WeightUnit;

/// Per (user, exercise) summary: last performance and personal best.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExercisePerformance {
    pub performance_id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub last_weight: Option<Decimal>,
    pub last_reps: Option<i32>,
    pub last_unit: Option<WeightUnit>,
    pub last_date: Option<NaiveDateTime>,
    pub last_set_count: Option<i32>,
    pub pb_weight: Option<Decimal>,
    pub pb_reps: Option<i32>,
    pub pb_unit: Option<WeightUnit>,
    pub pb_date: Option<NaiveDateTime>,
    pub total_workouts: i64,
    pub updated_at: NaiveDateTime,
}
