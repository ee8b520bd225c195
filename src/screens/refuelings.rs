//! Refuelings history.
//!
//! Loading is a chain: vehicles first, then refuelings. Without vehicles the
//! screen redirects to the "no vehicles" message and refuelings are never
//! requested. Rows name the vehicle by looking it up in the loaded vehicles.

use super::fixed::FixedScreen;
use crate::bridge::CommandBridge;
use crate::domain::{Refueling, Vehicle};
use crate::screen::{Action, Completion, Route, ScreenEvent, ScreenId, ScreenView};
use crate::ui::format::{format_date, format_eur, format_quantity};
use crate::ui::{ActionButton, Row, Template};

pub const REFUELINGS_TITLE: &str = "Refuelings";

/// Label of a refueling whose vehicle id matches no loaded vehicle.
pub const UNKNOWN_VEHICLE: &str = "Unknown vehicle";

/// Row shown when the history is empty.
pub const NO_REFUELINGS: &str = "No refuelings yet";

/// Vehicles and their refuelings, newest refueling first.
#[derive(Debug, Clone, PartialEq)]
pub struct RefuelingBook {
    pub vehicles: Vec<Vehicle>,
    pub refuelings: Vec<Refueling>,
}

impl RefuelingBook {
    /// Builds a book, sorting `refuelings` by date, newest first.
    #[must_use]
    pub fn new(vehicles: Vec<Vehicle>, mut refuelings: Vec<Refueling>) -> Self {
        refuelings.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            vehicles,
            refuelings,
        }
    }

    #[must_use]
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn vehicle_name(&self, id: &str) -> &str {
        self.vehicle(id).map_or(UNKNOWN_VEHICLE, |v| v.name.as_str())
    }
}

#[derive(Debug, Default)]
pub struct RefuelingsView;

impl ScreenView for RefuelingsView {
    type Payload = RefuelingBook;

    fn title(&self) -> String {
        REFUELINGS_TITLE.to_string()
    }

    fn loading_message(&self) -> String {
        "Loading refuelings...".to_string()
    }

    fn load(&self, bridge: &CommandBridge, completion: Completion<Self::Payload>) {
        let bridge_for_refuelings = bridge.clone();
        bridge.request::<Vehicle, _>(move |vehicles| {
            let vehicles = match vehicles {
                Ok(vehicles) => vehicles,
                Err(e) => return completion.fail(e.to_string()),
            };
            tracing::debug!(count = vehicles.len(), "vehicles loaded");

            if vehicles.is_empty() {
                completion.redirect(Route::NoVehicles);
                return;
            }
            if !completion.is_active() {
                tracing::debug!(screen = %completion.screen(), "screen gone, skipping refuelings");
                return;
            }

            bridge_for_refuelings.request::<Refueling, _>(move |refuelings| match refuelings {
                Ok(refuelings) => completion.succeed(RefuelingBook::new(vehicles, refuelings)),
                Err(e) => completion.fail(e.to_string()),
            });
        });
    }

    fn render(&self, book: &Self::Payload) -> Template {
        let rows = if book.refuelings.is_empty() {
            vec![Row::new(NO_REFUELINGS)]
        } else {
            book.refuelings
                .iter()
                .map(|refueling| {
                    Row::new(format!(
                        "{} - {}",
                        format_date(&refueling.date),
                        book.vehicle_name(&refueling.vehicle_id)
                    ))
                    .text(format!(
                        "{} L at {}/L",
                        format_quantity(refueling.liters),
                        format_eur(refueling.price_per_liter)
                    ))
                    .text(format!(
                        "Total: {} - {} km",
                        format_eur(refueling.total_amount),
                        format_quantity(refueling.kilometers)
                    ))
                    .selectable()
                })
                .collect()
        };

        Template::list(REFUELINGS_TITLE, rows)
            .with_action(ActionButton::new("Add", ScreenEvent::AddRefueling))
    }

    fn select(&self, book: &Self::Payload, event: &ScreenEvent) -> Vec<Action> {
        match event {
            ScreenEvent::Select(index) => book
                .refuelings
                .get(*index)
                .map(|refueling| {
                    Action::Push(Route::RefuelingDetail {
                        refueling: refueling.clone(),
                        vehicle: book.vehicle(&refueling.vehicle_id).cloned(),
                    })
                })
                .into_iter()
                .collect(),
            ScreenEvent::AddRefueling if book.vehicles.is_empty() => {
                vec![Action::Push(Route::Message {
                    title: "No vehicles".to_string(),
                    message: "Add a vehicle in the main app first.".to_string(),
                })]
            }
            ScreenEvent::AddRefueling => {
                vec![Action::Push(Route::SelectVehicle(book.vehicles.clone()))]
            }
            _ => Vec::new(),
        }
    }
}

/// Read-only detail pane of one refueling.
///
/// The consumption row appears only when consumption is known, and the notes
/// row only when there are notes.
#[must_use]
pub fn refueling_detail(id: ScreenId, refueling: &Refueling, vehicle: Option<&Vehicle>) -> FixedScreen {
    let mut rows = vec![
        Row::new("Date").text(format_date(&refueling.date)),
        Row::new("Vehicle").text(vehicle.map_or("Unknown", |v| v.name.as_str())),
        Row::new("Fuel").text(format!(
            "{} - {} liters",
            refueling.fuel_type,
            format_quantity(refueling.liters)
        )),
        Row::new("Price").text(format!(
            "{}/liter - Total: {}",
            format_eur(refueling.price_per_liter),
            format_eur(refueling.total_amount)
        )),
        Row::new("Odometer").text(format!("{} km", format_quantity(refueling.kilometers))),
    ];

    if let Some(consumption) = refueling.consumption().liters_per_100km() {
        rows.push(Row::new("Consumption").text(format!("{consumption:.2} L/100km")));
    }
    if let Some(notes) = refueling.notes.as_deref().filter(|n| !n.is_empty()) {
        rows.push(Row::new("Notes").text(notes));
    }

    FixedScreen::new(id, Template::pane("Refueling details", rows))
}
