use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::Postgres;
use utoipa::ToSchema;

/// Pounds per kilogram, as used for every kg/lbs conversion in the app.
const LBS_PER_KG: Decimal = Decimal::from_parts(220462, 0, 0, false, 5);

/// Decimal places a weight column can hold.
pub const WEIGHT_DECIMAL_PLACES: u32 = 2;

/// True when `weight` has no more decimals than the weight columns store,
/// ignoring trailing zeros.
pub fn fits_weight_precision(weight: &Decimal) -> bool {
    weight.normalize().scale() <= WEIGHT_DECIMAL_PLACES
}

/// Unit a weight was logged in. Stored as `'kg'` / `'lbs'` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown weight unit '{0}', expected 'kg' or 'lbs'")]
pub struct ParseWeightUnitError(String);

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
        }
    }

    /// Converts `weight` expressed in `self` into `target`.
    pub fn convert(&self, weight: Decimal, target: WeightUnit) -> Decimal {
        match (self, target) {
            (Self::Kg, WeightUnit::Lbs) => weight * LBS_PER_KG,
            (Self::Lbs, WeightUnit::Kg) => weight / LBS_PER_KG,
            _ => weight,
        }
    }

    pub fn to_kg(&self, weight: Decimal) -> Decimal {
        self.convert(weight, WeightUnit::Kg)
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = ParseWeightUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" => Ok(Self::Kg),
            "lb" | "lbs" => Ok(Self::Lbs),
            other => Err(ParseWeightUnitError(other.to_string())),
        }
    }
}

impl sqlx::Type<Postgres> for WeightUnit {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for WeightUnit {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl<'q> sqlx::Encode<'q, Postgres> for WeightUnit {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as sqlx::Encode<'q, Postgres>>::encode(self.as_str(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kg_to_lbs() {
        let lbs = WeightUnit::Kg.convert(Decimal::from(100), WeightUnit::Lbs);
        assert_eq!(lbs, Decimal::new(220462, 3));
    }

    #[test]
    fn test_lbs_to_kg_round_trip_is_close() {
        let kg = WeightUnit::Lbs.to_kg(Decimal::new(220462, 3));
        assert_eq!(kg.round_dp(2), Decimal::from(100));
    }

    #[test]
    fn test_same_unit_is_identity() {
        let weight = Decimal::new(625, 1);
        assert_eq!(WeightUnit::Kg.convert(weight, WeightUnit::Kg), weight);
        assert_eq!(WeightUnit::Lbs.convert(weight, WeightUnit::Lbs), weight);
    }

    #[test]
    fn test_weight_precision() {
        assert!(fits_weight_precision(&Decimal::new(10013, 2)));
        assert!(fits_weight_precision(&Decimal::new(1001300, 4)));
        assert!(fits_weight_precision(&Decimal::from(100)));
        assert!(!fits_weight_precision(&Decimal::new(100125, 3)));
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!(" LBS ".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("lb".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&WeightUnit::Lbs).unwrap();
        assert_eq!(json, "\"lbs\"");
        let unit: WeightUnit = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(unit, WeightUnit::Kg);
    }
}
