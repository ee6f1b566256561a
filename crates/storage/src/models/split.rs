use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// A named, ordered list of exercises making up a training day or program.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Split {
    pub split_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub exercise_ids: Vec<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Split {
    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(StorageError::Forbidden(
                "You do not have access to this split".to_string(),
            ))
        }
    }
}

/// Merges `additions` into `existing` with set semantics.
///
/// Existing order is kept; new references are appended in the order given,
/// skipping anything already present (including repeats within `additions`).
pub fn merge_exercise_refs(existing: &[Uuid], additions: &[Uuid]) -> Vec<Uuid> {
    let mut merged = existing.to_vec();
    for id in additions {
        if !merged.contains(id) {
            merged.push(*id);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_new_refs_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let merged = merge_exercise_refs(&[a], &[b, c]);
        assert_eq!(merged, vec![a, b, c]);
    }

    #[test]
    fn test_merge_same_ref_twice_keeps_single_entry() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let once = merge_exercise_refs(&[a], &[b]);
        let twice = merge_exercise_refs(&once, &[b]);
        assert_eq!(twice, vec![a, b]);

        let repeated = merge_exercise_refs(&[], &[b, b, a, b]);
        assert_eq!(repeated, vec![b, a]);
    }

    #[test]
    fn test_split_ownership() {
        let owner = Uuid::new_v4();
        let now = chrono::Utc::now().naive_utc();
        let split = Split {
            split_id: Uuid::new_v4(),
            user_id: owner,
            name: "Push Day".to_string(),
            description: None,
            exercise_ids: vec![],
            created_at: now,
            updated_at: now,
        };

        assert!(split.ensure_owned_by(owner).is_ok());
        assert!(matches!(
            split.ensure_owned_by(Uuid::new_v4()),
            Err(StorageError::Forbidden(_))
        ));
    }
}
