//! Root menu of the head-unit session.

use super::fixed::FixedScreen;
use crate::screen::{Route, ScreenId};
use crate::ui::{HeaderAction, Row, Template};
use crate::AppVariant;

const ENTRIES: [(&str, &str); 3] = [
    ("Nearby stations", "Find fuel stations near you"),
    ("Average fuel prices", "See the average price of each fuel"),
    ("My refuelings", "View and manage your refuelings"),
];

/// Message shown by variants without the refuelings screen.
pub const FEATURE_NOT_AVAILABLE: &str = "Feature not available";

/// Builds the main menu. Each row opens its screen; variants without
/// refuelings open a "not available" message instead.
#[must_use]
pub fn main_menu(id: ScreenId, variant: AppVariant) -> FixedScreen {
    let rows = ENTRIES
        .iter()
        .map(|(title, subtitle)| Row::new(*title).text(*subtitle).selectable())
        .collect();

    let refuelings = if variant.has_refuelings() {
        Route::Refuelings
    } else {
        Route::Message {
            title: "Refuelings".to_string(),
            message: FEATURE_NOT_AVAILABLE.to_string(),
        }
    };

    let template = Template::list(variant.title(), rows).with_header(HeaderAction::AppIcon);
    FixedScreen::new(id, template).with_targets(vec![
        Some(Route::NearestStations),
        Some(Route::AveragePrices),
        Some(refuelings),
    ])
}
