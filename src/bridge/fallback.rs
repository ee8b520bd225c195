//! Local data sets substituted when the engine cannot deliver real data.

use crate::domain::{FuelPrice, GasStation, Refueling, Vehicle};
use chrono::{Duration, Utc};

/// Why a fallback data set is being substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// The engine answered successfully with no records.
    EmptyReply,
    /// The request failed: remote error, not implemented, dropped reply,
    /// decoding failure or no channel.
    Failure,
}

/// Region label of the substituted average prices.
pub const NATIONAL_AVERAGE: &str = "National average";
pub const NATIONAL_AVERAGE_FALLBACK: &str = "National average (fallback)";

const FALLBACK_PRICE_DATE: &str = "2023-10-15";

/// Four stations in Milan without known coordinates.
#[must_use]
pub fn stations() -> Vec<GasStation> {
    vec![
        GasStation::new("1", "Eni Station", "Via Roma 123, Milano", 1.789, 1.789, 0.0, 0.0),
        GasStation::new("2", "Q8", "Viale Monza 45, Milano", 1.769, 1.789, 0.0, 0.0),
        GasStation::new("3", "Tamoil", "Corso Buenos Aires 78, Milano", 1.759, 1.789, 0.0, 0.0),
        GasStation::new("4", "IP", "Via Torino 56, Milano", 1.779, 1.789, 0.0, 0.0),
    ]
}

/// National average prices; the region label tells the two causes apart.
#[must_use]
pub fn average_prices(cause: FallbackCause) -> Vec<FuelPrice> {
    let region = match cause {
        FallbackCause::EmptyReply => NATIONAL_AVERAGE,
        FallbackCause::Failure => NATIONAL_AVERAGE_FALLBACK,
    };
    vec![
        FuelPrice::new("Benzina", 1.789, FALLBACK_PRICE_DATE, region),
        FuelPrice::new("Diesel", 1.659, FALLBACK_PRICE_DATE, region),
        FuelPrice::new("GPL", 0.765, FALLBACK_PRICE_DATE, region),
        FuelPrice::new("Metano", 1.599, FALLBACK_PRICE_DATE, region),
    ]
}

#[must_use]
pub fn vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: "1".to_string(),
            name: "My car".to_string(),
            brand: "Fiat".to_string(),
            model: "Panda".to_string(),
            fuel_type: "Benzina".to_string(),
            year: 2018,
            license_plate: "AB123CD".to_string(),
        },
        Vehicle {
            id: "2".to_string(),
            name: "Company car".to_string(),
            brand: "Volkswagen".to_string(),
            model: "Golf".to_string(),
            fuel_type: "Diesel".to_string(),
            year: 2020,
            license_plate: "XY456ZW".to_string(),
        },
    ]
}

/// Three refuelings of the fallback vehicles, dated relative to now.
#[must_use]
pub fn refuelings() -> Vec<Refueling> {
    let now = Utc::now();
    vec![
        Refueling {
            id: "1".to_string(),
            date: now,
            liters: 45.0,
            price_per_liter: 1.789,
            kilometers: 12500.0,
            total_amount: 80.50,
            fuel_type: "Benzina".to_string(),
            vehicle_id: "1".to_string(),
            notes: None,
        },
        Refueling {
            id: "2".to_string(),
            date: now - Duration::days(7),
            liters: 40.0,
            price_per_liter: 1.795,
            kilometers: 12200.0,
            total_amount: 71.80,
            fuel_type: "Benzina".to_string(),
            vehicle_id: "1".to_string(),
            notes: Some("Motorway".to_string()),
        },
        Refueling {
            id: "3".to_string(),
            date: now - Duration::days(15),
            liters: 50.0,
            price_per_liter: 1.659,
            kilometers: 11850.0,
            total_amount: 82.95,
            fuel_type: "Diesel".to_string(),
            vehicle_id: "2".to_string(),
            notes: Some("Long trip".to_string()),
        },
    ]
}
