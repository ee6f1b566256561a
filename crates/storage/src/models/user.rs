use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::WeightUnit;

/// Internal user record, synced from the identity provider.
///
/// `external_id` is the identity provider's subject; every authenticated
/// request is resolved to a `User` through it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub external_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub weight_unit: WeightUnit,
    pub rest_time_seconds: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BodyWeightEntry {
    pub entry_id: Uuid,
    pub user_id: Uuid,
    pub weight: Decimal,
    pub unit: WeightUnit,
    pub recorded_at: NaiveDateTime,
}
