//! Vehicle domain model.

use super::fields::{self, FieldMap};
use serde::Serialize;

/// A vehicle registered in the main application.
///
/// Vehicles are referenced by [`Refueling::vehicle_id`](super::Refueling) and
/// resolved by lookup, never by ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub fuel_type: String,
    pub year: u32,
    pub license_plate: String,
}

impl Vehicle {
    /// Decodes a vehicle from a remote record.
    ///
    /// Wire keys: `id, name, brand, model, fuelType, year, licensePlate`.
    /// Text fields default to empty strings and `year` to `0`.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            id: fields::text(fields, "id", ""),
            name: fields::text(fields, "name", ""),
            brand: fields::text(fields, "brand", ""),
            model: fields::text(fields, "model", ""),
            fuel_type: fields::text(fields, "fuelType", ""),
            year: fields::whole(fields, "year"),
            license_plate: fields::text(fields, "licensePlate", ""),
        }
    }

    /// One-line description used by selection lists: `"Fiat Panda - Benzina"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {} - {}", self.brand, self.model, self.fuel_type)
    }
}
