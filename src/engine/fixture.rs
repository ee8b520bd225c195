//! Canned engine replies.
//!
//! A [`FixtureSource`] answers every method from a fixed table. The table is
//! either the built-in [`sample`](FixtureSource::sample) data or a JSON file
//! mapping method names to [`MethodReply`] values.

use super::channel::MethodReply;
use super::local::ReplySource;
use crate::domain::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Reply source backed by a method-name table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSource {
    replies: BTreeMap<String, MethodReply>,
}

impl FixtureSource {
    /// Creates a source with no methods; every call is answered with
    /// [`MethodReply::NotImplemented`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a fixture table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid table.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let source = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            methods = source.replies.len(),
            "loaded engine fixture"
        );
        Ok(source)
    }

    /// Parses a fixture table.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a JSON object of replies.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let replies: BTreeMap<String, MethodReply> = serde_json::from_str(content)?;
        Ok(Self { replies })
    }

    /// Sets the reply for `method`, replacing any previous one.
    #[must_use]
    pub fn with_reply(mut self, method: &str, reply: MethodReply) -> Self {
        self.replies.insert(method.to_string(), reply);
        self
    }

    /// Number of methods with a configured reply.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// A small, plausible data set for demos.
    #[must_use]
    pub fn sample() -> Self {
        Self::empty()
            .with_reply("getNearestStations", MethodReply::Success(sample_stations()))
            .with_reply("getAveragePrices", MethodReply::Success(sample_prices()))
            .with_reply("getVehicles", MethodReply::Success(sample_vehicles()))
            .with_reply("getRefuelings", MethodReply::Success(sample_refuelings()))
    }
}

impl ReplySource for FixtureSource {
    fn reply(&mut self, method: &str, _arguments: Option<&Value>) -> MethodReply {
        self.replies
            .get(method)
            .cloned()
            .unwrap_or(MethodReply::NotImplemented)
    }
}

fn sample_stations() -> Value {
    json!([
        {
            "id": "st-101",
            "name": "Esso Porta Nuova",
            "address": "Piazza della Repubblica 9, Milano",
            "self": 1.749,
            "servito": 1.899,
            "lat": 45.4801,
            "lon": 9.1986
        },
        {
            "id": "st-102",
            "name": "Api Lambrate",
            "address": "Via Rombon 12, Milano",
            "self": 1.735,
            "servito": 1.865,
            "lat": 45.4912,
            "lon": 9.2391
        }
    ])
}

fn sample_prices() -> Value {
    json!([
        { "fuelType": "Benzina", "price": 1.812, "date": "2024-03-04", "region": "Lombardia" },
        { "fuelType": "Diesel", "price": 1.702, "date": "2024-03-04", "region": "Lombardia" },
        { "fuelType": "GPL", "price": 0.731, "date": "2024-03-04", "region": "Lombardia" }
    ])
}

fn sample_vehicles() -> Value {
    json!([
        {
            "id": "v-1",
            "name": "City car",
            "brand": "Fiat",
            "model": "500",
            "fuelType": "Benzina",
            "year": 2019,
            "licensePlate": "FZ204KL"
        }
    ])
}

fn sample_refuelings() -> Value {
    json!([
        {
            "id": "r-1",
            "date": "2024-02-20T08:15:00Z",
            "liters": 32.5,
            "pricePerLiter": 1.799,
            "kilometers": 40210,
            "totalAmount": 58.47,
            "fuelType": "Benzina",
            "vehicleId": "v-1",
            "notes": "Tangenziale Est"
        },
        {
            "id": "r-2",
            "date": "2024-03-02",
            "liters": 28.0,
            "pricePerLiter": 1.815,
            "kilometers": 40655,
            "fuelType": "Benzina",
            "vehicleId": "v-1"
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_methods_are_not_implemented() {
        let mut source = FixtureSource::sample();
        assert_eq!(source.reply("getTyres", None), MethodReply::NotImplemented);
    }

    #[test]
    fn table_parses_every_reply_kind() {
        let source = FixtureSource::from_json_str(
            r#"{
                "getVehicles": { "success": [] },
                "getRefuelings": { "error": { "code": "DB", "message": "locked" } },
                "getAveragePrices": "not_implemented"
            }"#,
        )
        .expect("valid fixture");

        assert_eq!(source.len(), 3);
        let mut source = source;
        assert_eq!(
            source.reply("getRefuelings", None),
            MethodReply::error("DB", Some("locked"))
        );
    }

    #[test]
    fn malformed_table_is_rejected() {
        assert!(FixtureSource::from_json_str("[1, 2]").is_err());
    }
}
