//! Generic data-backed screen.
//!
//! [`DataScreen`] pairs a [`ScreenController`] with a [`ScreenView`] that
//! knows how to load, render and react to selections for one payload type.
//! The loading and error templates are the same for every screen.

use super::actions::{Action, ScreenEvent};
use super::controller::{Completion, Loader, ScreenController};
use super::state::ScreenState;
use super::{Screen, ScreenId};
use crate::bridge::CommandBridge;
use crate::host::SharedHost;
use crate::ui::{ActionButton, Template};
use std::sync::Arc;

/// Title of the error template.
pub const ERROR_TITLE: &str = "Error";

/// Screen-specific part of a data-backed screen.
pub trait ScreenView: Send + Sync + 'static {
    type Payload: Send + 'static;

    /// Title shown while loading and when redirected.
    fn title(&self) -> String;

    fn loading_message(&self) -> String;

    /// Issues the bridge calls and completes with the payload.
    fn load(&self, bridge: &CommandBridge, completion: Completion<Self::Payload>);

    /// Template of the ready state. Must not have side effects.
    fn render(&self, payload: &Self::Payload) -> Template;

    /// Reacts to an event in the ready state. Retry and back are handled by
    /// the screen itself.
    fn select(&self, payload: &Self::Payload, event: &ScreenEvent) -> Vec<Action> {
        let _ = (payload, event);
        Vec::new()
    }
}

struct ViewLoader<V> {
    view: Arc<V>,
    bridge: CommandBridge,
}

impl<V: ScreenView> Loader<V::Payload> for ViewLoader<V> {
    fn load(&self, completion: Completion<V::Payload>) {
        self.view.load(&self.bridge, completion);
    }
}

/// A screen showing remote data through the loading, ready and error states.
pub struct DataScreen<V: ScreenView> {
    view: Arc<V>,
    controller: ScreenController<V::Payload>,
}

impl<V: ScreenView> DataScreen<V> {
    /// Builds the screen and starts its first load.
    pub fn new(id: ScreenId, view: V, bridge: CommandBridge, host: SharedHost) -> Self {
        let view = Arc::new(view);
        let loader = Arc::new(ViewLoader {
            view: Arc::clone(&view),
            bridge,
        });
        let controller = ScreenController::new(id, host, loader);
        controller.start();
        Self { view, controller }
    }

    #[must_use]
    pub const fn controller(&self) -> &ScreenController<V::Payload> {
        &self.controller
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }
}

/// Message shown for a failed load.
#[must_use]
pub fn error_template(reason: &str) -> Template {
    Template::message(ERROR_TITLE, &format!("An error occurred: {reason}"))
        .with_action(ActionButton::new("Retry", ScreenEvent::Retry))
}

impl<V: ScreenView> Screen for DataScreen<V> {
    fn id(&self) -> ScreenId {
        self.controller.id()
    }

    fn template(&self) -> Template {
        self.controller.with_state(|state| match state {
            ScreenState::Loading => {
                Template::message(&self.view.title(), &self.view.loading_message())
            }
            ScreenState::Ready(payload) => self.view.render(payload),
            ScreenState::Error(reason) => error_template(reason),
            ScreenState::Redirected => Template::message(&self.view.title(), "Nothing to show")
                .with_action(ActionButton::new("Retry", ScreenEvent::Retry)),
        })
    }

    fn handle(&mut self, event: &ScreenEvent) -> Vec<Action> {
        match event {
            ScreenEvent::Retry => {
                if !self.controller.retry() {
                    tracing::debug!(screen = %self.controller.id(), "retry ignored");
                }
                Vec::new()
            }
            ScreenEvent::Back => vec![Action::Pop],
            _ => self.controller.with_state(|state| match state {
                ScreenState::Ready(payload) => self.view.select(payload, event),
                _ => Vec::new(),
            }),
        }
    }

    fn on_dispose(&mut self) {
        self.controller.dispose();
    }
}
