//! Screen lifecycle shared by every head-unit screen.
//!
//! This module is the application layer between the host (which owns the
//! navigation stack and the main thread) and the bridge (which fetches data).
//! It follows a unidirectional flow:
//!
//! ```text
//! ScreenEvent → Screen::handle → Vec<Action> → host
//! load done → Completion → host main context → state change → invalidate
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Events, routes and actions
//! - [`state`]: `ScreenState` and `LoadOutcome`
//! - [`controller`]: The state machine with cancellation-safe completions
//! - [`view`]: Generic data-backed screen

pub mod actions;
pub mod controller;
pub mod state;
pub mod view;

pub use actions::{Action, Route, ScreenEvent};
pub use controller::{Completion, Loader, ScreenController, Subscription};
pub use state::{LoadOutcome, ScreenState, UNKNOWN_ERROR};
pub use view::{error_template, DataScreen, ScreenView};

use crate::ui::Template;
use std::fmt;

/// Identity of one screen instance on the host stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A screen on the host stack.
///
/// Screens are driven from the host's main context only.
pub trait Screen {
    fn id(&self) -> ScreenId;

    /// Current template. A pure function of the screen's state.
    fn template(&self) -> Template;

    /// Handles one user event and returns the actions for the host.
    fn handle(&mut self, event: &ScreenEvent) -> Vec<Action>;

    /// Called once when the screen leaves the stack.
    fn on_dispose(&mut self) {}
}
