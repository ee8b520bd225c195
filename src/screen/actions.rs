//! Events raised by the head unit and actions produced by screens.
//!
//! A screen turns each [`ScreenEvent`] into a list of [`Action`]s. The host
//! executes the actions in order; screens never touch the navigation stack
//! themselves.
//!
//! # Example
//!
//! ```rust
//! use tankfuel_auto::screen::{Action, Route};
//!
//! let actions = vec![Action::Push(Route::NearestStations)];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::{GasStation, Refueling, Vehicle};
use crate::host::NavigationIntent;

/// User input delivered to the top screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenEvent {
    /// A row was selected; the index is the row position in the template.
    Select(usize),

    /// The retry button of an error message was pressed.
    Retry,

    /// The "Navigate" button of a station detail pane was pressed.
    Navigate,

    /// The "Add" button of the refuelings action strip was pressed.
    AddRefueling,

    /// A button asking to leave the screen was pressed.
    Back,
}

/// A screen the host can build and push.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    MainMenu,
    NearestStations,
    AveragePrices,
    Refuelings,
    StationDetail(GasStation),
    RefuelingDetail {
        refueling: Refueling,
        /// Vehicle resolved from the refueling's vehicle id, if found.
        vehicle: Option<Vehicle>,
    },
    /// Shown instead of the refuelings list when no vehicle exists.
    NoVehicles,
    /// First step of the add-refueling flow.
    SelectVehicle(Vec<Vehicle>),
    /// Last step of the add-refueling flow.
    AddRefuelingInfo(Vehicle),
    /// Static message with a back button.
    Message { title: String, message: String },
}

impl Route {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::NearestStations => "nearest_stations",
            Self::AveragePrices => "average_prices",
            Self::Refuelings => "refuelings",
            Self::StationDetail(_) => "station_detail",
            Self::RefuelingDetail { .. } => "refueling_detail",
            Self::NoVehicles => "no_vehicles",
            Self::SelectVehicle(_) => "select_vehicle",
            Self::AddRefuelingInfo(_) => "add_refueling_info",
            Self::Message { .. } => "message",
        }
    }
}

/// Side effects requested by a screen, executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Builds the screen for the route and pushes it on the stack.
    Push(Route),

    /// Pops the top screen. The root screen is never popped.
    Pop,

    /// Launches an external navigation app. Failures are logged and ignored.
    LaunchNavigation(NavigationIntent),
}
