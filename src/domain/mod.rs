//! Domain layer: the entities shown on the head unit and the crate error type.
//!
//! Entities are immutable value records decoded from loosely-typed remote
//! replies. Decoding is tolerant per field: a missing or mistyped field takes a
//! default, and the element is kept.
//!
//! # Organization
//!
//! - [`error`]: Error types and result alias
//! - [`fields`]: Tolerant field extraction helpers
//! - [`station`], [`price`], [`vehicle`], [`refueling`]: Entities

pub mod error;
pub mod fields;
pub mod price;
pub mod refueling;
pub mod station;
pub mod vehicle;

pub use error::{Result, TankFuelError};
pub use fields::FieldMap;
pub use price::FuelPrice;
pub use refueling::{Consumption, Refueling};
pub use station::GasStation;
pub use vehicle::Vehicle;
