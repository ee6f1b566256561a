use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::push::SubscriptionKeys;
use crate::error::Result;
use crate::models::PushSubscription;

const SUBSCRIPTION_COLUMNS: &str =
    "subscription_id, user_id, endpoint, p256dh, auth, is_active, created_at, updated_at";

pub struct PushSubscriptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PushSubscriptionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PushSubscription>> {
        let subscriptions = sqlx::query_as::<_, PushSubscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM push_subscriptions
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(subscriptions)
    }

    pub async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<PushSubscription>> {
        let subscriptions = sqlx::query_as::<_, PushSubscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM push_subscriptions
            WHERE user_id = $1 AND is_active
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(subscriptions)
    }

    /// Every record for the endpoint, most recently updated first, locked
    /// for the rest of the transaction.
    pub async fn lock_by_endpoint(
        &self,
        endpoint: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PushSubscription>> {
        let subscriptions = sqlx::query_as::<_, PushSubscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM push_subscriptions
            WHERE endpoint = $1
            ORDER BY updated_at DESC
            FOR UPDATE
            "#
        ))
        .bind(endpoint)
        .fetch_all(&mut **tx)
        .await?;

        Ok(subscriptions)
    }

    /// Creates an active record. A concurrent insert of the same live
    /// (user, endpoint) pair refreshes that record's keys instead of failing.
    pub async fn insert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        keys: &SubscriptionKeys,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<PushSubscription> {
        let subscription = sqlx::query_as::<_, PushSubscription>(&format!(
            r#"
            INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, endpoint) WHERE is_active
            DO UPDATE SET
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(endpoint)
        .bind(&keys.p256dh)
        .bind(&keys.auth)
        .fetch_one(&mut **tx)
        .await?;

        Ok(subscription)
    }

    /// Gives the record to `user_id` with fresh keys and reactivates it.
    pub async fn claim(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
        keys: &SubscriptionKeys,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE push_subscriptions
            SET user_id = $2,
                p256dh = $3,
                auth = $4,
                is_active = TRUE,
                updated_at = CURRENT_TIMESTAMP
            WHERE subscription_id = $1
            "#,
        )
        .bind(subscription_id)
        .bind(user_id)
        .bind(&keys.p256dh)
        .bind(&keys.auth)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn deactivate_many(
        &self,
        subscription_ids: &[Uuid],
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<()> {
        if subscription_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE push_subscriptions
            SET is_active = FALSE,
                updated_at = CURRENT_TIMESTAMP
            WHERE subscription_id = ANY($1)
            "#,
        )
        .bind(subscription_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Removes the user's record for an endpoint. Returns whether one existed.
    pub async fn delete_for_user(&self, user_id: Uuid, endpoint: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id)
                .bind(endpoint)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Used when the push service reports the endpoint as gone.
    pub async fn delete(&self, subscription_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM push_subscriptions WHERE subscription_id = $1")
            .bind(subscription_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
