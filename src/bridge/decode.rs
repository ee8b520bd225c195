//! Reply decoding.
//!
//! A successful reply is expected to be a list of field maps. Each map is
//! decoded with per-field defaults, so a malformed record still yields an
//! entity. Only a reply that is not a list at all is a decoding failure.

use super::fallback::{self, FallbackCause};
use super::operation::Operation;
use crate::domain::{FieldMap, FuelPrice, GasStation, Refueling, Result, TankFuelError, Vehicle};
use serde_json::Value;

/// An entity returned by one bridge operation.
pub trait RemoteEntity: Sized + Send + 'static {
    /// Operation that returns this entity.
    const OPERATION: Operation;

    /// Decodes one record with per-field defaults.
    fn from_fields(fields: &FieldMap) -> Self;

    /// Data substituted for a failed or empty reply.
    fn fallback(cause: FallbackCause) -> Vec<Self>;
}

impl RemoteEntity for GasStation {
    const OPERATION: Operation = Operation::GetNearestStations;

    fn from_fields(fields: &FieldMap) -> Self {
        GasStation::from_fields(fields)
    }

    fn fallback(_cause: FallbackCause) -> Vec<Self> {
        fallback::stations()
    }
}

impl RemoteEntity for FuelPrice {
    const OPERATION: Operation = Operation::GetAveragePrices;

    fn from_fields(fields: &FieldMap) -> Self {
        FuelPrice::from_fields(fields)
    }

    fn fallback(cause: FallbackCause) -> Vec<Self> {
        fallback::average_prices(cause)
    }
}

impl RemoteEntity for Vehicle {
    const OPERATION: Operation = Operation::GetVehicles;

    fn from_fields(fields: &FieldMap) -> Self {
        Vehicle::from_fields(fields)
    }

    fn fallback(_cause: FallbackCause) -> Vec<Self> {
        fallback::vehicles()
    }
}

impl RemoteEntity for Refueling {
    const OPERATION: Operation = Operation::GetRefuelings;

    fn from_fields(fields: &FieldMap) -> Self {
        Refueling::from_fields(fields)
    }

    fn fallback(_cause: FallbackCause) -> Vec<Self> {
        fallback::refuelings()
    }
}

/// Decodes a success payload into entities.
///
/// `null` is an empty list. List elements that are not objects are skipped.
///
/// # Errors
///
/// Returns [`TankFuelError::Decode`] if the payload is neither a list nor
/// `null`.
pub fn decode_reply<T: RemoteEntity>(payload: &Value) -> Result<Vec<T>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let decoded: Vec<T> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(fields) => Some(T::from_fields(fields)),
                    other => {
                        tracing::warn!(
                            operation = %T::OPERATION,
                            element = %other,
                            "skipping non-record element"
                        );
                        None
                    }
                })
                .collect();
            Ok(decoded)
        }
        other => Err(TankFuelError::Decode(format!(
            "{} expected a list, got {}",
            T::OPERATION,
            kind_of(other)
        ))),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn station_record_decodes_field_for_field() {
        let stations: Vec<GasStation> = decode_reply(&json!([{
            "id": "1", "name": "Eni", "address": "Via Roma",
            "self": 1.7, "servito": 1.9, "lat": 45.0, "lon": 9.0
        }]))
        .expect("list payload");

        assert_eq!(
            stations,
            vec![GasStation::new("1", "Eni", "Via Roma", 1.7, 1.9, 45.0, 9.0)]
        );
    }

    #[test]
    fn missing_price_decodes_as_zero() {
        let prices: Vec<FuelPrice> =
            decode_reply(&json!([{ "fuelType": "Diesel" }])).expect("list payload");
        assert_eq!(prices.len(), 1);
        assert!(prices[0].price.abs() < f64::EPSILON);
    }

    #[test]
    fn non_record_elements_are_skipped() {
        let vehicles: Vec<Vehicle> =
            decode_reply(&json!([42, { "id": "v" }, "x"])).expect("list payload");
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "v");
    }

    #[test]
    fn null_is_empty_and_object_is_an_error() {
        let empty: Vec<Refueling> = decode_reply(&Value::Null).expect("null payload");
        assert!(empty.is_empty());

        let err = decode_reply::<Refueling>(&json!({ "id": "r" })).unwrap_err();
        assert!(matches!(err, TankFuelError::Decode(_)));
    }
}
