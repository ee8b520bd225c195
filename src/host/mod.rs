//! The head-unit host as seen by screens.
//!
//! The real host SDK owns the navigation stack, the main thread and the
//! renderer. Screens only need three capabilities from it, captured by the
//! [`Host`] trait: run a task on the main context, request a re-render, and
//! execute an [`Action`].
//!
//! # Modules
//!
//! - [`navigation`]: External navigation intents and the [`Navigator`] seam
//! - [`queued`]: [`QueuedHost`], an in-process main-context queue
//! - [`session`]: [`CarSession`], an in-process screen stack driving screens

pub mod navigation;
pub mod queued;
pub mod session;

pub use navigation::{LogNavigator, NavigationIntent, Navigator, MAPS_PACKAGE};
pub use queued::QueuedHost;
pub use session::CarSession;

use crate::screen::{Action, ScreenId};
use std::sync::Arc;

/// Work handed to the host's main context.
pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

/// Capabilities the host offers to screens.
pub trait Host: Send + Sync {
    /// Runs `task` on the main context, after the current task returns.
    fn run_on_main(&self, task: MainTask);

    /// Asks the host to fetch a fresh template from `screen`.
    fn invalidate(&self, screen: ScreenId);

    /// Executes a screen action, such as pushing a screen.
    fn perform(&self, action: Action);
}

pub type SharedHost = Arc<dyn Host>;
