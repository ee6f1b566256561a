use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{LoggedSet, WeightUnit, WorkoutSession, fits_weight_precision};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct StartWorkoutRequest {
    /// Pre-populates the session with the split's exercises, in split order
    pub split_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddExerciseSetRequest {
    pub exercise_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogSetRequest {
    #[validate(range(min = 0, max = 1000, message = "Reps must be between 0 and 1000"))]
    pub reps: i32,

    #[validate(custom(function = "validate_set_weight"))]
    pub weight: Decimal,

    /// Defaults to the user's preferred unit
    pub unit: Option<WeightUnit>,

    #[serde(default)]
    pub is_body_weight: bool,

    #[validate(length(max = 200, message = "Notes must be at most 200 characters"))]
    pub notes: Option<String>,
}

fn validate_set_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight < Decimal::ZERO || *weight > Decimal::from(2000) {
        let mut err = validator::ValidationError::new("invalid_weight");
        err.message = Some("Weight must be between 0 and 2000".into());
        return Err(err);
    }
    if !fits_weight_precision(weight) {
        let mut err = validator::ValidationError::new("invalid_weight_precision");
        err.message = Some("Weight must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

impl LogSetRequest {
    pub fn into_logged_set(self, default_unit: WeightUnit) -> LoggedSet {
        LoggedSet {
            id: Uuid::new_v4(),
            reps: self.reps,
            weight: self.weight,
            unit: self.unit.unwrap_or(default_unit),
            is_body_weight: self.is_body_weight,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetExerciseActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompleteWorkoutRequest {
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// An exercise set joined with its exercise name, in session order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseSetDetail {
    pub exercise_set_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub order_index: i32,
    pub is_active: bool,
    #[schema(value_type = Vec<LoggedSet>)]
    pub sets: Json<Vec<LoggedSet>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutDetailResponse {
    pub session_id: Uuid,
    pub split_id: Option<Uuid>,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub exercises: Vec<ExerciseSetDetail>,
}

impl WorkoutDetailResponse {
    pub fn new(session: WorkoutSession, exercises: Vec<ExerciseSetDetail>) -> Self {
        Self {
            session_id: session.session_id,
            split_id: session.split_id,
            started_at: session.started_at,
            completed_at: session.completed_at,
            notes: session.notes,
            is_active: session.is_active,
            exercises,
        }
    }
}

/// Row of the session history list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutSummary {
    pub session_id: Uuid,
    pub split_id: Option<Uuid>,
    pub split_name: Option<String>,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub exercise_count: i64,
    pub set_count: i64,
}

/// A personal best set while completing a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PersonalBestUpdate {
    pub exercise_id: Uuid,
    pub weight: Decimal,
    pub reps: i32,
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteWorkoutResponse {
    pub workout: WorkoutSession,
    pub personal_bests: Vec<PersonalBestUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_request(reps: i32, weight: Decimal) -> LogSetRequest {
        LogSetRequest {
            reps,
            weight,
            unit: None,
            is_body_weight: false,
            notes: None,
        }
    }

    #[test]
    fn test_log_set_bounds() {
        assert!(set_request(5, Decimal::from(100)).validate().is_ok());
        assert!(set_request(0, Decimal::ZERO).validate().is_ok());
        assert!(set_request(-1, Decimal::from(100)).validate().is_err());
        assert!(set_request(5, Decimal::from(-5)).validate().is_err());
        assert!(set_request(5, Decimal::from(2001)).validate().is_err());
    }

    #[test]
    fn test_log_set_weight_precision() {
        assert!(set_request(5, Decimal::new(10025, 2)).validate().is_ok());
        assert!(set_request(5, Decimal::new(100125, 3)).validate().is_err());
        assert!(set_request(5, Decimal::new(100126, 3)).validate().is_err());
    }

    #[test]
    fn test_into_logged_set_uses_default_unit() {
        let set = set_request(8, Decimal::from(60)).into_logged_set(WeightUnit::Lbs);
        assert_eq!(set.unit, WeightUnit::Lbs);
        assert_eq!(set.reps, 8);

        let mut explicit = set_request(8, Decimal::from(60));
        explicit.unit = Some(WeightUnit::Kg);
        explicit.notes = Some("   ".to_string());
        let set = explicit.into_logged_set(WeightUnit::Lbs);
        assert_eq!(set.unit, WeightUnit::Kg);
        assert_eq!(set.notes, None);
    }

    #[test]
    fn test_completion_notes_limit() {
        let req = CompleteWorkoutRequest {
            notes: Some("n".repeat(1001)),
        };
        assert!(req.validate().is_err());
    }
}
