use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user::{IdentityProfile, UpdatePreferencesRequest};
use crate::error::{Result, StorageError};
use crate::models::{BodyWeightEntry, User, WeightUnit};

const USER_COLUMNS: &str = r#"
    user_id, external_id, display_name, email, image_url,
    weight_unit, rest_time_seconds, created_at, updated_at
"#;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find user by identity-provider subject
    pub async fn find_by_external_id(&self, external_id: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    /// Create or refresh a user from identity-provider profile data.
    /// Preferences are never touched by a sync.
    pub async fn upsert_from_identity(&self, profile: &IdentityProfile) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (external_id, display_name, email, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (external_id)
            DO UPDATE SET
                display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&profile.external_id)
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(&profile.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user and, by cascade, everything they own.
    /// Returns whether a row was removed.
    pub async fn delete_by_external_id(&self, external_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE external_id = $1")
            .bind(external_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        req: &UpdatePreferencesRequest,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET weight_unit = COALESCE($2, weight_unit),
                rest_time_seconds = COALESCE($3, rest_time_seconds),
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(req.weight_unit)
        .bind(req.rest_time_seconds)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn add_body_weight(
        &self,
        user_id: Uuid,
        weight: Decimal,
        unit: WeightUnit,
    ) -> Result<BodyWeightEntry> {
        let entry = sqlx::query_as::<_, BodyWeightEntry>(
            r#"
            INSERT INTO body_weight_entries (user_id, weight, unit)
            VALUES ($1, $2, $3)
            RETURNING entry_id, user_id, weight, unit, recorded_at
            "#,
        )
        .bind(user_id)
        .bind(weight)
        .bind(unit)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    /// Body-weight history, most recent first
    pub async fn list_body_weight(&self, user_id: Uuid) -> Result<Vec<BodyWeightEntry>> {
        let entries = sqlx::query_as::<_, BodyWeightEntry>(
            r#"
            SELECT entry_id, user_id, weight, unit, recorded_at
            FROM body_weight_entries
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
