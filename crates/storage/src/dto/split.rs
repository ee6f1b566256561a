use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Split;

/// Request payload for creating a split
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSplitRequest {
    #[validate(custom(function = "validate_split_name"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub exercise_ids: Vec<Uuid>,
}

/// Length is checked on the trimmed name, which is what gets stored.
#[allow(clippy::ptr_arg)]
fn validate_split_name(name: &String) -> Result<(), validator::ValidationError> {
    let len = name.trim().chars().count();
    if (3..=50).contains(&len) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_split_name");
        err.message = Some("Split name must be between 3 and 50 characters".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddSplitExercisesRequest {
    #[validate(length(min = 1, max = 100, message = "Provide between 1 and 100 exercises"))]
    pub exercise_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitResponse {
    pub split_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub exercise_ids: Vec<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Split> for SplitResponse {
    fn from(split: Split) -> Self {
        Self {
            split_id: split.split_id,
            name: split.name,
            description: split.description,
            exercise_ids: split.exercise_ids,
            created_at: split.created_at,
            updated_at: split.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CreateSplitRequest {
        CreateSplitRequest {
            name: name.to_string(),
            description: None,
            exercise_ids: vec![],
        }
    }

    #[test]
    fn test_name_too_short() {
        assert!(request("ab").validate().is_err());
    }

    #[test]
    fn test_name_min_length() {
        assert!(request("abc").validate().is_ok());
    }

    #[test]
    fn test_name_max_length() {
        assert!(request(&"a".repeat(50)).validate().is_ok());
        assert!(request(&"a".repeat(51)).validate().is_err());
    }

    #[test]
    fn test_padded_name_is_measured_trimmed() {
        let errors = request("  ab  ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(request("   ").validate().is_err());
        assert!(request("  abc  ").validate().is_ok());
        assert!(request(&format!(" {} ", "a".repeat(50))).validate().is_ok());
    }

    #[test]
    fn test_description_limit() {
        let mut req = request("Upper Body");
        req.description = Some("x".repeat(500));
        assert!(req.validate().is_ok());

        req.description = Some("x".repeat(501));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_add_requires_at_least_one_exercise() {
        let empty = AddSplitExercisesRequest {
            exercise_ids: vec![],
        };
        assert!(empty.validate().is_err());
    }
}
