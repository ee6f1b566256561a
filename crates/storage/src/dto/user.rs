use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{User, WeightUnit, fits_weight_precision};

/// Profile fields relayed by the identity provider on sign-up / profile change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub external_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub weight_unit: WeightUnit,
    pub rest_time_seconds: i32,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
            email: user.email,
            image_url: user.image_url,
            weight_unit: user.weight_unit,
            rest_time_seconds: user.rest_time_seconds,
            created_at: user.created_at,
        }
    }
}

/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub weight_unit: Option<WeightUnit>,

    #[validate(range(
        min = 0,
        max = 3600,
        message = "Rest time must be between 0 and 3600 seconds"
    ))]
    pub rest_time_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogBodyWeightRequest {
    #[validate(custom(function = "validate_body_weight"))]
    pub weight: Decimal,

    /// Defaults to the user's preferred unit
    pub unit: Option<WeightUnit>,
}

fn validate_body_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight <= Decimal::ZERO || *weight > Decimal::from(1000) {
        let mut err = validator::ValidationError::new("invalid_body_weight");
        err.message = Some("Body weight must be greater than 0 and at most 1000".into());
        return Err(err);
    }
    if !fits_weight_precision(weight) {
        let mut err = validator::ValidationError::new("invalid_weight_precision");
        err.message = Some("Body weight must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_time_bounds() {
        let ok = UpdatePreferencesRequest {
            weight_unit: Some(WeightUnit::Lbs),
            rest_time_seconds: Some(120),
        };
        assert!(ok.validate().is_ok());

        let too_long = UpdatePreferencesRequest {
            weight_unit: None,
            rest_time_seconds: Some(3601),
        };
        assert!(too_long.validate().is_err());

        assert!(UpdatePreferencesRequest::default().validate().is_ok());
    }

    #[test]
    fn test_body_weight_must_be_positive() {
        let zero = LogBodyWeightRequest {
            weight: Decimal::ZERO,
            unit: None,
        };
        assert!(zero.validate().is_err());

        let ok = LogBodyWeightRequest {
            weight: Decimal::new(825, 1),
            unit: Some(WeightUnit::Kg),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_body_weight_precision() {
        let precise = LogBodyWeightRequest {
            weight: Decimal::new(82455, 3),
            unit: None,
        };
        assert!(precise.validate().is_err());
    }
}
