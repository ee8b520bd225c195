//! In-process head-unit session.
//!
//! [`CarSession`] holds the screen stack and plays the host's main loop on
//! top of a [`QueuedHost`]: it dispatches user events to the top screen,
//! applies the resulting actions, runs posted main-context tasks and applies
//! the actions those tasks request.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = CarSession::new(factory, host, Box::new(LogNavigator));
//! session.dispatch(ScreenEvent::Select(0)); // open nearby stations
//! session.settle(Duration::from_millis(200));
//! println!("{}", render(&session.render().unwrap()));
//! ```

use super::navigation::Navigator;
use super::queued::QueuedHost;
use crate::screen::{Action, Route, Screen, ScreenEvent, ScreenId};
use crate::screens::ScreenFactory;
use crate::ui::Template;
use std::sync::Arc;
use std::time::Duration;

pub struct CarSession {
    host: Arc<QueuedHost>,
    factory: ScreenFactory,
    navigator: Box<dyn Navigator>,
    stack: Vec<Box<dyn Screen>>,
}

impl CarSession {
    /// Starts a session with the main menu as root screen.
    pub fn new(factory: ScreenFactory, host: Arc<QueuedHost>, navigator: Box<dyn Navigator>) -> Self {
        let mut session = Self {
            host,
            factory,
            navigator,
            stack: Vec::new(),
        };
        session.push(Route::MainMenu);
        session
    }

    /// Number of screens on the stack, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn top(&self) -> Option<&dyn Screen> {
        self.stack.last().map(|screen| &**screen)
    }

    /// Identity of the top screen.
    #[must_use]
    pub fn top_id(&self) -> Option<ScreenId> {
        self.top().map(|screen| screen.id())
    }

    /// Template of the top screen.
    #[must_use]
    pub fn render(&self) -> Option<Template> {
        self.top().map(|screen| screen.template())
    }

    /// Delivers `event` to the top screen, applies its actions and runs the
    /// main-context tasks that are ready.
    pub fn dispatch(&mut self, event: ScreenEvent) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        let span = tracing::debug_span!("dispatch", screen = %top.id(), ?event);
        let _guard = span.entered();

        let actions = top.handle(&event);
        for action in actions {
            self.apply(action);
        }
        self.pump();
    }

    /// Runs queued main-context tasks and applies the actions they request,
    /// until nothing is left. Returns the number of tasks run.
    pub fn pump(&mut self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.host.run_pending();
            let actions = self.host.take_actions();
            if ran == 0 && actions.is_empty() {
                return total;
            }
            total += ran;
            for action in actions {
                self.apply(action);
            }
        }
    }

    /// Pumps until no task arrives for `quiet`. Returns the number of tasks
    /// run.
    ///
    /// Replies from an engine on another thread arrive as posted tasks; this
    /// waits for them. A request that is never answered is not waited for
    /// beyond `quiet`.
    pub fn settle(&mut self, quiet: Duration) -> usize {
        let mut total = self.pump();
        loop {
            let ran = self.host.wait_and_run(quiet);
            if ran == 0 {
                return total;
            }
            total += ran + self.pump();
        }
    }

    /// Executes one screen action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Push(route) => self.push(route),
            Action::Pop => {
                self.pop();
            }
            Action::LaunchNavigation(intent) => {
                if let Err(e) = self.navigator.launch(&intent) {
                    tracing::warn!(uri = %intent.uri, error = %e, "navigation could not be started");
                }
            }
        }
    }

    /// Builds the screen for `route` and pushes it.
    pub fn push(&mut self, route: Route) {
        tracing::debug!(route = route.name(), depth = self.stack.len(), "pushing screen");
        let screen = self.factory.build(route);
        self.stack.push(screen);
    }

    /// Pops and disposes the top screen. The root screen stays; returns
    /// `false` when nothing was popped.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            tracing::debug!("not popping the root screen");
            return false;
        }
        match self.stack.pop() {
            Some(mut screen) => {
                tracing::debug!(screen = %screen.id(), "popping screen");
                screen.on_dispose();
                true
            }
            None => false,
        }
    }

    /// Drains the re-render requests recorded so far.
    pub fn take_invalidations(&self) -> Vec<ScreenId> {
        self.host.take_invalidations()
    }

    #[must_use]
    pub fn host(&self) -> &Arc<QueuedHost> {
        &self.host
    }

    #[must_use]
    pub fn factory(&self) -> &ScreenFactory {
        &self.factory
    }
}

impl std::fmt::Debug for CarSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarSession")
            .field("depth", &self.stack.len())
            .field("top", &self.top_id())
            .finish_non_exhaustive()
    }
}
