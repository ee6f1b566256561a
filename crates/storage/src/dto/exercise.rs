use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request payload for creating a custom exercise
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExerciseRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 10,
        message = "Between 1 and 10 muscle groups are required"
    ))]
    #[validate(custom(function = "validate_muscle_groups"))]
    pub muscle_groups: Vec<String>,

    #[validate(length(max = 50))]
    pub equipment: Option<String>,
}

#[allow(clippy::ptr_arg)]
fn validate_muscle_groups(groups: &Vec<String>) -> Result<(), validator::ValidationError> {
    if groups.iter().all(|g| !g.trim().is_empty() && g.len() <= 50) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_muscle_group"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ExerciseFilter {
    /// Only exercises targeting this muscle group
    pub muscle_group: Option<String>,
    /// Case-insensitive substring of the exercise name
    pub search: Option<String>,
}

impl CreateExerciseRequest {
    /// Lower-cased, trimmed, de-duplicated muscle group tags.
    pub fn normalized_muscle_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::with_capacity(self.muscle_groups.len());
        for group in &self.muscle_groups {
            let group = group.trim().to_lowercase();
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, groups: &[&str]) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
            equipment: None,
        }
    }

    #[test]
    fn test_requires_muscle_group() {
        assert!(request("Zercher Squat", &[]).validate().is_err());
        assert!(request("Zercher Squat", &["quads"]).validate().is_ok());
        assert!(request("Zercher Squat", &["  "]).validate().is_err());
    }

    #[test]
    fn test_requires_name() {
        assert!(request("", &["quads"]).validate().is_err());
    }

    #[test]
    fn test_normalized_muscle_groups() {
        let req = request("Zercher Squat", &["Quads", "glutes ", "quads"]);
        assert_eq!(req.normalized_muscle_groups(), vec!["quads", "glutes"]);
    }
}
