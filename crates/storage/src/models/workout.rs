use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::WeightUnit;
use crate::error::{Result, StorageError};

/// A workout, active until it is completed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub split_id: Option<Uuid>,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl WorkoutSession {
    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(StorageError::Forbidden(
                "You do not have access to this workout".to_string(),
            ))
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// One exercise within a session, holding its logged sets.
///
/// The logged-set list only grows by appending and shrinks by removal; it is
/// never reordered.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseSet {
    pub exercise_set_id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub order_index: i32,
    pub is_active: bool,
    #[schema(value_type = Vec<LoggedSet>)]
    pub sets: Json<Vec<LoggedSet>>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoggedSet {
    pub id: Uuid,
    pub reps: i32,
    pub weight: Decimal,
    pub unit: WeightUnit,
    #[serde(default)]
    pub is_body_weight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
