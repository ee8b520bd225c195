//! Concrete head-unit screens and the factory that builds them from routes.
//!
//! # Modules
//!
//! - [`menu`]: Root menu, parameterized by [`AppVariant`]
//! - [`stations`]: Nearby stations and station detail
//! - [`prices`]: Average prices
//! - [`refuelings`]: Refuelings history and refueling detail
//! - [`flow`]: Add-refueling flow and message screens
//! - [`fixed`]: Screens with content known up front

pub mod fixed;
pub mod flow;
pub mod menu;
pub mod prices;
pub mod refuelings;
pub mod stations;

pub use fixed::FixedScreen;
pub use prices::PricesView;
pub use refuelings::{RefuelingBook, RefuelingsView};
pub use stations::StationsView;

use crate::bridge::CommandBridge;
use crate::host::SharedHost;
use crate::screen::{DataScreen, Route, Screen, ScreenId, ScreenView};
use crate::AppVariant;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Builds screens for routes. Both app variants share it.
pub struct ScreenFactory {
    variant: AppVariant,
    bridge: CommandBridge,
    host: SharedHost,
    next_id: AtomicU64,
}

impl ScreenFactory {
    #[must_use]
    pub fn new(variant: AppVariant, bridge: CommandBridge, host: SharedHost) -> Self {
        Self {
            variant,
            bridge,
            host,
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds the screen for `route`. Data screens start loading right away.
    pub fn build(&self, route: Route) -> Box<dyn Screen> {
        let id = ScreenId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(screen = %id, route = route.name(), "building screen");

        match route {
            Route::MainMenu => Box::new(menu::main_menu(id, self.variant)),
            Route::NearestStations => Box::new(self.data_screen(id, StationsView)),
            Route::AveragePrices => Box::new(self.data_screen(id, PricesView)),
            Route::Refuelings => Box::new(self.data_screen(id, RefuelingsView)),
            Route::StationDetail(station) => Box::new(stations::station_detail(id, &station)),
            Route::RefuelingDetail { refueling, vehicle } => Box::new(
                refuelings::refueling_detail(id, &refueling, vehicle.as_ref()),
            ),
            Route::NoVehicles => Box::new(flow::no_vehicles(id)),
            Route::SelectVehicle(vehicles) => Box::new(flow::select_vehicle(id, &vehicles)),
            Route::AddRefuelingInfo(vehicle) => {
                Box::new(flow::add_refueling_info(id, self.variant, &vehicle))
            }
            Route::Message { title, message } => Box::new(flow::message(id, &title, &message)),
        }
    }

    fn data_screen<V: ScreenView>(&self, id: ScreenId, view: V) -> DataScreen<V> {
        DataScreen::new(id, view, self.bridge.clone(), Arc::clone(&self.host))
    }

    #[must_use]
    pub const fn variant(&self) -> AppVariant {
        self.variant
    }

    #[must_use]
    pub const fn bridge(&self) -> &CommandBridge {
        &self.bridge
    }
}

impl std::fmt::Debug for ScreenFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenFactory")
            .field("variant", &self.variant)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
