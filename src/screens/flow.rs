//! Message screens and the guided add-refueling flow.
//!
//! Adding a refueling is not possible while driving. The flow lets the driver
//! pick a vehicle and then explains that the entry must be made in the main
//! application. Nothing is sent to the engine.

use super::fixed::FixedScreen;
use crate::domain::Vehicle;
use crate::screen::{Route, ScreenEvent, ScreenId};
use crate::ui::{ActionButton, Row, Template};
use crate::AppVariant;

/// Static message with a single button that leaves the screen.
#[must_use]
pub fn message(id: ScreenId, title: &str, message: &str) -> FixedScreen {
    let template =
        Template::message(title, message).with_action(ActionButton::new("OK", ScreenEvent::Back));
    FixedScreen::new(id, template)
}

/// Shown instead of the refuelings list when there is no vehicle.
#[must_use]
pub fn no_vehicles(id: ScreenId) -> FixedScreen {
    let template = Template::message(
        "No vehicles",
        "No vehicle exists. Please create one in the main app.",
    )
    .with_action(ActionButton::new("Go back", ScreenEvent::Back));
    FixedScreen::new(id, template)
}

/// First step: one row per vehicle.
#[must_use]
pub fn select_vehicle(id: ScreenId, vehicles: &[Vehicle]) -> FixedScreen {
    let rows = vehicles
        .iter()
        .map(|v| Row::new(v.name.as_str()).text(v.summary()).selectable())
        .collect();
    let targets = vehicles
        .iter()
        .map(|v| Some(Route::AddRefuelingInfo(v.clone())))
        .collect();
    FixedScreen::new(id, Template::list("Select vehicle", rows)).with_targets(targets)
}

/// Last step: explains where to enter the refueling for `vehicle`.
#[must_use]
pub fn add_refueling_info(id: ScreenId, variant: AppVariant, vehicle: &Vehicle) -> FixedScreen {
    let text = format!(
        "For driving safety, refueling details must be entered in the main app.\n\n\
         Use the {} app on your smartphone to add a new refueling for the vehicle {}.",
        variant.title(),
        vehicle.name
    );
    let template = Template::message("Add refueling", &text)
        .with_action(ActionButton::new("Got it", ScreenEvent::Back));
    FixedScreen::new(id, template)
}
