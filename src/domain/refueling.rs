//! Refueling domain model.
//!
//! A refueling is one fill-up of a vehicle. It references its vehicle by id and
//! carries an odometer reading. Fuel consumption is a derived attribute that
//! needs the previous refueling of the same vehicle; it is not computed here
//! and is reported as [`Consumption::NotComputed`].

use super::fields::{self, FieldMap};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Derived fuel consumption of a refueling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Consumption {
    /// Needs the previous refueling of the same vehicle, which is not looked up.
    NotComputed,
}

impl Consumption {
    /// Liters per 100 km, when known.
    #[must_use]
    pub const fn liters_per_100km(self) -> Option<f64> {
        match self {
            Self::NotComputed => None,
        }
    }
}

impl std::fmt::Display for Consumption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotComputed => write!(f, "not computed"),
        }
    }
}

/// One fill-up of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refueling {
    pub id: String,
    pub date: DateTime<Utc>,
    pub liters: f64,
    pub price_per_liter: f64,
    /// Odometer reading at the time of the fill-up.
    pub kilometers: f64,
    pub total_amount: f64,
    pub fuel_type: String,
    pub vehicle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Refueling {
    /// Decodes a refueling from a remote record.
    ///
    /// Wire keys: `id, date, liters, pricePerLiter, kilometers, totalAmount,
    /// fuelType, notes, vehicleId`. `totalAmount` defaults to
    /// `liters * pricePerLiter`; `date` accepts a full timestamp or a bare
    /// `yyyy-MM-dd` date and defaults to the current time.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        let liters = fields::number_or_zero(fields, "liters");
        let price_per_liter = fields::number_or_zero(fields, "pricePerLiter");
        let total_amount =
            fields::number(fields, "totalAmount").unwrap_or(liters * price_per_liter);
        let date = fields
            .get("date")
            .and_then(serde_json::Value::as_str)
            .and_then(parse_date)
            .unwrap_or_else(Utc::now);

        Self {
            id: fields::text(fields, "id", ""),
            date,
            liters,
            price_per_liter,
            kilometers: fields::number_or_zero(fields, "kilometers"),
            total_amount,
            fuel_type: fields::text(fields, "fuelType", ""),
            vehicle_id: fields::text(fields, "vehicleId", ""),
            notes: fields::optional_text(fields, "notes"),
        }
    }

    /// Fuel consumption in liters per 100 km.
    ///
    /// Always [`Consumption::NotComputed`]: the computation needs the previous
    /// refueling of the same vehicle.
    #[must_use]
    pub const fn consumption(&self) -> Consumption {
        Consumption::NotComputed
    }
}

/// Parses a remote date: RFC 3339, `yyyy-MM-ddTHH:mm:ss[.SSS]` (assumed UTC),
/// or a bare `yyyy-MM-dd` at midnight UTC.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.contains('T') {
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
