//! Per-operation fallback policy.
//!
//! The bridge substitutes local fallback data instead of surfacing a failure
//! in some situations, and the situations differ per operation. The defaults
//! are:
//!
//! | operation            | empty reply | remote failure | no channel |
//! |----------------------|-------------|----------------|------------|
//! | `getAveragePrices`   | fallback    | fallback       | error      |
//! | `getNearestStations` | fallback    | fallback       | fallback   |
//! | `getVehicles`        | empty list  | fallback       | fallback   |
//! | `getRefuelings`      | empty list  | fallback       | fallback   |
//!
//! A policy file overrides individual flags:
//!
//! ```toml
//! [vehicles]
//! substitute_on_empty = true
//!
//! [average_prices]
//! fail_without_channel = false
//! ```

use super::operation::Operation;
use crate::domain::{Result, TankFuelError};
use serde::Deserialize;
use std::path::Path;

/// What the bridge does when an operation cannot deliver real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Replace an empty success reply with the fallback data set.
    pub substitute_on_empty: bool,

    /// Replace a remote error, a not-implemented reply, a dropped reply or a
    /// local decoding failure with the fallback data set.
    pub substitute_on_error: bool,

    /// Fail the request when no channel exists, instead of substituting.
    pub fail_without_channel: bool,
}

impl FallbackPolicy {
    /// Built-in policy of `operation`.
    #[must_use]
    pub const fn default_for(operation: Operation) -> Self {
        match operation {
            Operation::GetAveragePrices => Self {
                substitute_on_empty: true,
                substitute_on_error: true,
                fail_without_channel: true,
            },
            Operation::GetNearestStations => Self {
                substitute_on_empty: true,
                substitute_on_error: true,
                fail_without_channel: false,
            },
            Operation::GetVehicles | Operation::GetRefuelings => Self {
                substitute_on_empty: false,
                substitute_on_error: true,
                fail_without_channel: false,
            },
        }
    }
}

/// Fallback policies of all four operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    pub average_prices: FallbackPolicy,
    pub nearest_stations: FallbackPolicy,
    pub vehicles: FallbackPolicy,
    pub refuelings: FallbackPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            average_prices: FallbackPolicy::default_for(Operation::GetAveragePrices),
            nearest_stations: FallbackPolicy::default_for(Operation::GetNearestStations),
            vehicles: FallbackPolicy::default_for(Operation::GetVehicles),
            refuelings: FallbackPolicy::default_for(Operation::GetRefuelings),
        }
    }
}

impl BridgeConfig {
    /// Policy that applies to `operation`.
    #[must_use]
    pub const fn policy(&self, operation: Operation) -> FallbackPolicy {
        match operation {
            Operation::GetAveragePrices => self.average_prices,
            Operation::GetNearestStations => self.nearest_stations,
            Operation::GetVehicles => self.vehicles,
            Operation::GetRefuelings => self.refuelings,
        }
    }

    /// Loads a policy file. Missing tables and flags keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a policy document. Missing tables and flags keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML or has unknown tables.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawBridgeConfig = toml::from_str(content)?;
        let config = Self {
            average_prices: merge(Operation::GetAveragePrices, raw.average_prices),
            nearest_stations: merge(Operation::GetNearestStations, raw.nearest_stations),
            vehicles: merge(Operation::GetVehicles, raw.vehicles),
            refuelings: merge(Operation::GetRefuelings, raw.refuelings),
        };
        tracing::debug!(?config, "bridge policy loaded");
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but reports a clearer error for
    /// a missing file.
    ///
    /// # Errors
    ///
    /// Returns [`TankFuelError::Config`] if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TankFuelError::Config(format!(
                "bridge policy file not found: {}",
                path.display()
            )));
        }
        Self::from_file(path)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBridgeConfig {
    average_prices: Option<RawPolicy>,
    nearest_stations: Option<RawPolicy>,
    vehicles: Option<RawPolicy>,
    refuelings: Option<RawPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    substitute_on_empty: Option<bool>,
    substitute_on_error: Option<bool>,
    fail_without_channel: Option<bool>,
}

fn merge(operation: Operation, raw: Option<RawPolicy>) -> FallbackPolicy {
    let defaults = FallbackPolicy::default_for(operation);
    let Some(raw) = raw else {
        return defaults;
    };
    FallbackPolicy {
        substitute_on_empty: raw.substitute_on_empty.unwrap_or(defaults.substitute_on_empty),
        substitute_on_error: raw.substitute_on_error.unwrap_or(defaults.substitute_on_error),
        fail_without_channel: raw
            .fail_without_channel
            .unwrap_or(defaults.fail_without_channel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_average_prices_fails_without_channel() {
        let config = BridgeConfig::default();
        let failing: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|op| config.policy(*op).fail_without_channel)
            .collect();
        assert_eq!(failing, vec![Operation::GetAveragePrices]);
    }

    #[test]
    fn empty_replies_are_kept_for_personal_data() {
        let config = BridgeConfig::default();
        assert!(!config.vehicles.substitute_on_empty);
        assert!(!config.refuelings.substitute_on_empty);
        assert!(config.nearest_stations.substitute_on_empty);
        assert!(config.average_prices.substitute_on_empty);
    }

    #[test]
    fn empty_document_is_the_default() {
        let config = BridgeConfig::from_toml_str("").expect("empty toml");
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn overrides_merge_onto_defaults() {
        let config = BridgeConfig::from_toml_str(
            "[vehicles]\nsubstitute_on_empty = true\n\n[average_prices]\nfail_without_channel = false\n",
        )
        .expect("valid toml");

        assert!(config.vehicles.substitute_on_empty);
        assert!(config.vehicles.substitute_on_error);
        assert!(!config.average_prices.fail_without_channel);
        assert_eq!(config.refuelings, BridgeConfig::default().refuelings);
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(BridgeConfig::from_toml_str("[tyres]\nsubstitute_on_empty = true\n").is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = BridgeConfig::load(Path::new("/nonexistent/bridge.toml")).unwrap_err();
        assert!(matches!(err, TankFuelError::Config(_)));
    }
}
