use serde::{Deserialize, Serialize};
use std::fmt;

/// A named remote operation exposed by the application engine.
///
/// Every operation takes no arguments and answers with a list of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetAveragePrices,
    GetNearestStations,
    GetVehicles,
    GetRefuelings,
}

impl Operation {
    pub const ALL: [Self; 4] = [
        Self::GetAveragePrices,
        Self::GetNearestStations,
        Self::GetVehicles,
        Self::GetRefuelings,
    ];

    /// Method name on the wire.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::GetAveragePrices => "getAveragePrices",
            Self::GetNearestStations => "getNearestStations",
            Self::GetVehicles => "getVehicles",
            Self::GetRefuelings => "getRefuelings",
        }
    }

    /// Key of the operation's table in a bridge policy file.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::GetAveragePrices => "average_prices",
            Self::GetNearestStations => "nearest_stations",
            Self::GetVehicles => "vehicles",
            Self::GetRefuelings => "refuelings",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}
