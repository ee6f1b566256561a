use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// An exercise from the global catalog, or a custom one owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub name: String,
    pub muscle_groups: Vec<String>,
    pub equipment: Option<String>,
    pub is_custom: bool,
    pub owner_user_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl Exercise {
    /// Catalog exercises are readable by everyone, custom ones only by their owner.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        !self.is_custom || self.owner_user_id == Some(user_id)
    }

    pub fn ensure_visible_to(&self, user_id: Uuid) -> Result<()> {
        if self.is_visible_to(user_id) {
            Ok(())
        } else {
            Err(StorageError::Forbidden(
                "You do not have access to this exercise".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(is_custom: bool, owner: Option<Uuid>) -> Exercise {
        Exercise {
            exercise_id: Uuid::new_v4(),
            name: "Bench Press".to_string(),
            muscle_groups: vec!["chest".to_string(), "triceps".to_string()],
            equipment: Some("barbell".to_string()),
            is_custom,
            owner_user_id: owner,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_catalog_exercise_visible_to_everyone() {
        let catalog = exercise(false, None);
        assert!(catalog.ensure_visible_to(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_custom_exercise_visible_to_owner() {
        let owner = Uuid::new_v4();
        let custom = exercise(true, Some(owner));
        assert!(custom.ensure_visible_to(owner).is_ok());
    }

    #[test]
    fn test_custom_exercise_forbidden_for_other_user() {
        let owner = Uuid::new_v4();
        let custom = exercise(true, Some(owner));
        let result = custom.ensure_visible_to(Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::Forbidden(_))));
    }
}
