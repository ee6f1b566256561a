use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Web Push subscription registered by a browser or installed PWA.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PushSubscription {
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PushSubscription {
    pub fn keys_match(&self, p256dh: &str, auth: &str) -> bool {
        self.p256dh == p256dh && self.auth == auth
    }
}
