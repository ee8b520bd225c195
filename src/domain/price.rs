//! Average fuel price domain model.

use super::fields::{self, FieldMap, UNKNOWN};
use serde::Serialize;

/// Date label used when the remote record has none.
pub const DEFAULT_PRICE_DATE: &str = "Today";

/// Region label used when the remote record has none.
pub const DEFAULT_REGION: &str = "Italy";

/// Average price of one fuel type in a region.
///
/// `fuel_type` is never empty (it falls back to `"Unknown"`), and `price`
/// is never negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPrice {
    pub fuel_type: String,
    pub price: f64,
    pub date: String,
    pub region: String,
}

impl FuelPrice {
    #[must_use]
    pub fn new(fuel_type: &str, price: f64, date: &str, region: &str) -> Self {
        Self {
            fuel_type: fuel_type.to_string(),
            price,
            date: date.to_string(),
            region: region.to_string(),
        }
    }

    /// Decodes a price from a remote record (`fuelType, price, date, region`).
    ///
    /// A missing `price` decodes as `0.0`; the element is kept.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            fuel_type: fields::label(fields, "fuelType", UNKNOWN),
            price: fields::amount(fields, "price"),
            date: fields::text(fields, "date", DEFAULT_PRICE_DATE),
            region: fields::text(fields, "region", DEFAULT_REGION),
        }
    }
}
