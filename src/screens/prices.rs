//! Average fuel prices list.

use crate::bridge::CommandBridge;
use crate::domain::price::DEFAULT_REGION;
use crate::domain::FuelPrice;
use crate::screen::{Completion, ScreenView};
use crate::ui::format::format_eur;
use crate::ui::{Row, Template};

/// Average prices list. Rows are informational and not selectable.
#[derive(Debug, Default)]
pub struct PricesView;

impl ScreenView for PricesView {
    type Payload = Vec<FuelPrice>;

    fn title(&self) -> String {
        "Average prices".to_string()
    }

    fn loading_message(&self) -> String {
        "Loading prices...".to_string()
    }

    fn load(&self, bridge: &CommandBridge, completion: Completion<Self::Payload>) {
        bridge.request::<FuelPrice, _>(move |result| match result {
            Ok(prices) => completion.succeed(prices),
            Err(e) => completion.fail(e.to_string()),
        });
    }

    fn render(&self, prices: &Self::Payload) -> Template {
        let region = prices.first().map_or(DEFAULT_REGION, |p| p.region.as_str());
        let rows = prices
            .iter()
            .map(|price| {
                Row::new(price.fuel_type.as_str())
                    .text(format!("{} per liter", format_eur(price.price)))
                    .text(format!("Updated: {}", price.date))
            })
            .collect();
        Template::list(&format!("Average prices - {region}"), rows)
    }
}
