//! Gas station domain model.

use super::fields::{self, FieldMap};
use serde::Serialize;

/// Placeholder name for a station whose record carries no usable name.
pub const UNKNOWN_STATION: &str = "Unknown station";

/// A fuel station near the vehicle.
///
/// Prices are in euro per liter and never negative. Coordinates default to
/// `0.0` when the remote side does not know them; `(0.0, 0.0)` is a sentinel,
/// not "no location".
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tankfuel_auto::domain::GasStation;
///
/// let record = json!({"id": "1", "name": "Eni", "self": 1.7});
/// let station = GasStation::from_fields(record.as_object().unwrap());
/// assert_eq!(station.name, "Eni");
/// assert_eq!(station.attended_price, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasStation {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(rename = "self")]
    pub self_service_price: f64,
    #[serde(rename = "servito")]
    pub attended_price: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl GasStation {
    /// Creates a station from its parts.
    #[must_use]
    pub fn new(
        id: &str,
        name: &str,
        address: &str,
        self_service_price: f64,
        attended_price: f64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            self_service_price,
            attended_price,
            latitude,
            longitude,
        }
    }

    /// Decodes a station from a remote record, defaulting every bad field.
    ///
    /// Wire keys: `id, name, address, self, servito, lat, lon`.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            id: fields::text(fields, "id", ""),
            name: fields::text(fields, "name", UNKNOWN_STATION),
            address: fields::text(fields, "address", ""),
            self_service_price: fields::amount(fields, "self"),
            attended_price: fields::amount(fields, "servito"),
            latitude: fields::number_or_zero(fields, "lat"),
            longitude: fields::number_or_zero(fields, "lon"),
        }
    }

    /// Returns `true` unless both coordinates hold the `0.0` sentinel.
    #[must_use]
    pub fn has_known_location(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }
}
