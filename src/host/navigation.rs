//! External navigation intents.

use crate::domain::Result;
use serde::Serialize;

/// Package of the maps application targeted by navigation intents.
pub const MAPS_PACKAGE: &str = "com.google.android.apps.maps";

/// Request to start turn-by-turn navigation in another application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationIntent {
    /// Intent data, e.g. `google.navigation:q=45.48,9.19`.
    pub uri: String,

    /// Application expected to handle the intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl NavigationIntent {
    /// Navigation to a coordinate pair in the maps application.
    #[must_use]
    pub fn to_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            uri: format!("google.navigation:q={latitude},{longitude}"),
            package: Some(MAPS_PACKAGE.to_string()),
        }
    }
}

/// Launches navigation intents outside the head-unit session.
pub trait Navigator: Send {
    /// Starts the intent. Fire-and-forget: success only means it was handed
    /// over.
    ///
    /// # Errors
    ///
    /// Returns [`TankFuelError::Navigation`](crate::domain::TankFuelError)
    /// when no application can handle the intent.
    fn launch(&self, intent: &NavigationIntent) -> Result<()>;
}

/// Navigator that only logs the intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn launch(&self, intent: &NavigationIntent) -> Result<()> {
        tracing::info!(
            uri = %intent.uri,
            package = intent.package.as_deref().unwrap_or("any"),
            "launching navigation"
        );
        Ok(())
    }
}
