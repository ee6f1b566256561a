use sqlx::PgPool;
use storage::{
    dto::user::{LogBodyWeightRequest, UpdatePreferencesRequest},
    error::Result,
    models::{BodyWeightEntry, User},
    repository::user::UserRepository,
};

/// Update unit / rest-time preferences
pub async fn update_preferences(
    pool: &PgPool,
    user: &User,
    request: &UpdatePreferencesRequest,
) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.update_preferences(user.user_id, request).await
}

/// Record a body-weight measurement, in the user's unit unless one is given
pub async fn log_body_weight(
    pool: &PgPool,
    user: &User,
    request: &LogBodyWeightRequest,
) -> Result<BodyWeightEntry> {
    let repo = UserRepository::new(pool);
    let unit = request.unit.unwrap_or(user.weight_unit);
    repo.add_body_weight(user.user_id, request.weight, unit).await
}

pub async fn list_body_weight(pool: &PgPool, user: &User) -> Result<Vec<BodyWeightEntry>> {
    let repo = UserRepository::new(pool);
    repo.list_body_weight(user.user_id).await
}
