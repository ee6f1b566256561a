use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::LoggedSet;

/// One completed session's sets for a single exercise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseHistoryEntry {
    pub session_id: Uuid,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    #[schema(value_type = Vec<LoggedSet>)]
    pub sets: Json<Vec<LoggedSet>>,
}
