//! Nearby stations list and station detail pane.

use super::fixed::FixedScreen;
use crate::bridge::CommandBridge;
use crate::domain::GasStation;
use crate::host::NavigationIntent;
use crate::screen::{Action, Completion, Route, ScreenEvent, ScreenId, ScreenView};
use crate::ui::format::format_eur;
use crate::ui::{ActionButton, Row, Template};

pub const STATIONS_TITLE: &str = "Nearby stations";

#[derive(Debug, Default)]
pub struct StationsView;

impl ScreenView for StationsView {
    type Payload = Vec<GasStation>;

    fn title(&self) -> String {
        STATIONS_TITLE.to_string()
    }

    fn loading_message(&self) -> String {
        "Loading stations...".to_string()
    }

    fn load(&self, bridge: &CommandBridge, completion: Completion<Self::Payload>) {
        bridge.request::<GasStation, _>(move |result| match result {
            Ok(stations) => completion.succeed(stations),
            Err(e) => completion.fail(e.to_string()),
        });
    }

    fn render(&self, stations: &Self::Payload) -> Template {
        let rows = stations
            .iter()
            .map(|station| {
                Row::new(station.name.as_str())
                    .text(format!(
                        "Self: {} - Attended: {} {}",
                        format_eur(station.self_service_price),
                        format_eur(station.attended_price),
                        station.address
                    ))
                    .selectable()
            })
            .collect();
        Template::list(STATIONS_TITLE, rows)
    }

    fn select(&self, stations: &Self::Payload, event: &ScreenEvent) -> Vec<Action> {
        match event {
            ScreenEvent::Select(index) => stations
                .get(*index)
                .map(|station| Action::Push(Route::StationDetail(station.clone())))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Detail pane of one station with a "Navigate" button.
#[must_use]
pub fn station_detail(id: ScreenId, station: &GasStation) -> FixedScreen {
    let rows = vec![
        Row::new("Station").text(station.name.as_str()),
        Row::new("Address").text(station.address.as_str()),
        Row::new("Price").text(format!(
            "Self: {} per liter, Attended: {} per liter",
            format_eur(station.self_service_price),
            format_eur(station.attended_price)
        )),
    ];
    if !station.has_known_location() {
        tracing::debug!(station = %station.id, "station has no known location");
    }

    let template = Template::pane("Station details", rows)
        .with_action(ActionButton::new("Navigate", ScreenEvent::Navigate));
    FixedScreen::new(id, template).with_navigation(NavigationIntent::to_coordinates(
        station.latitude,
        station.longitude,
    ))
}
