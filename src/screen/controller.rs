//! The per-screen asynchronous state machine.
//!
//! A [`ScreenController`] owns the [`ScreenState`] of one screen and drives
//! its [`Loader`]. Loads complete on arbitrary threads; a [`Completion`] never
//! mutates state there. It posts a task to the host's main context, and that
//! task applies the outcome and requests one re-render.
//!
//! # Cancellation
//!
//! Every load gets a [`Subscription`] ticket. Disposing the screen or starting
//! a newer load invalidates older tickets, and a main-context task holding a
//! stale ticket does nothing. Because disposal and the tasks both run on the
//! main context, the check cannot race.
//!
//! # Example
//!
//! ```rust,ignore
//! let controller = ScreenController::new(id, host, Arc::new(StationsLoader { bridge }));
//! controller.start();
//! // ... host runs the posted task ...
//! controller.with_state(|state| assert!(state.is_ready()));
//! ```

use super::actions::{Action, Route};
use super::state::{LoadOutcome, ScreenState};
use super::ScreenId;
use crate::host::SharedHost;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct SubscriptionState {
    disposed: AtomicBool,
    generation: AtomicU64,
}

/// Ticket tying one load to the screen that issued it.
#[derive(Debug, Clone)]
pub struct Subscription {
    state: Arc<SubscriptionState>,
    ticket: u64,
}

impl Subscription {
    /// `true` while the screen is alive and no newer load was started.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.state.disposed.load(Ordering::SeqCst)
            && self.state.generation.load(Ordering::SeqCst) == self.ticket
    }
}

/// Completes one load of a screen. Consumed by the first outcome.
pub struct Completion<T> {
    screen: ScreenId,
    host: SharedHost,
    state: Arc<Mutex<ScreenState<T>>>,
    subscription: Subscription,
}

impl<T: Send + 'static> Completion<T> {
    pub fn succeed(self, payload: T) {
        self.finish(LoadOutcome::Ready(payload));
    }

    /// Fails the load; an empty reason is shown as "Unknown error".
    pub fn fail(self, reason: impl Into<String>) {
        self.finish(LoadOutcome::failed(reason));
    }

    pub fn redirect(self, route: Route) {
        self.finish(LoadOutcome::Redirect(route));
    }

    /// Hands `outcome` to the main context, where it is applied if the load
    /// is still current.
    pub fn finish(self, outcome: LoadOutcome<T>) {
        let Self {
            screen,
            host,
            state,
            subscription,
        } = self;

        let main_host = Arc::clone(&host);
        host.run_on_main(Box::new(move || {
            let span = tracing::debug_span!("screen_complete", screen = %screen);
            let _guard = span.entered();

            if !subscription.is_active() {
                tracing::debug!("screen no longer active, dropping load outcome");
                return;
            }

            let redirect = {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                match outcome {
                    LoadOutcome::Ready(payload) => {
                        tracing::debug!("load ready");
                        *state = ScreenState::Ready(payload);
                        None
                    }
                    LoadOutcome::Failed(reason) => {
                        tracing::warn!(reason = %reason, "load failed");
                        *state = ScreenState::Error(reason);
                        None
                    }
                    LoadOutcome::Redirect(route) => {
                        tracing::debug!(route = route.name(), "load redirected");
                        *state = ScreenState::Redirected;
                        Some(route)
                    }
                }
            };

            if let Some(route) = redirect {
                main_host.perform(Action::Push(route));
            }
            main_host.invalidate(screen);
        }));
    }

    /// Screen this completion belongs to.
    #[must_use]
    pub const fn screen(&self) -> ScreenId {
        self.screen
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }
}

/// Fetches the data of a screen and reports it through a [`Completion`].
///
/// Implementations may complete synchronously or from any thread. A loader
/// that drops the completion without calling it leaves the screen loading.
pub trait Loader<T>: Send + Sync {
    fn load(&self, completion: Completion<T>);
}

/// Owns the state of one data-backed screen and runs its loads.
pub struct ScreenController<T> {
    id: ScreenId,
    host: SharedHost,
    loader: Arc<dyn Loader<T>>,
    state: Arc<Mutex<ScreenState<T>>>,
    subscription: Arc<SubscriptionState>,
}

impl<T: Send + 'static> ScreenController<T> {
    /// Creates a controller in the `Loading` state. No load runs until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(id: ScreenId, host: SharedHost, loader: Arc<dyn Loader<T>>) -> Self {
        Self {
            id,
            host,
            loader,
            state: Arc::new(Mutex::new(ScreenState::Loading)),
            subscription: Arc::new(SubscriptionState::default()),
        }
    }

    /// Enters `Loading` and issues a new load. Older loads become stale.
    pub fn start(&self) {
        if self.subscription.disposed.load(Ordering::SeqCst) {
            tracing::debug!(screen = %self.id, "not loading a disposed screen");
            return;
        }

        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = ScreenState::Loading;
        let ticket = self.subscription.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(screen = %self.id, ticket, "load started");

        self.loader.load(Completion {
            screen: self.id,
            host: Arc::clone(&self.host),
            state: Arc::clone(&self.state),
            subscription: Subscription {
                state: Arc::clone(&self.subscription),
                ticket,
            },
        });
    }

    /// Restarts the load from `Error` or `Redirected`.
    ///
    /// Returns `false`, doing nothing, in any other state.
    pub fn retry(&self) -> bool {
        let can_retry = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .can_retry();
        if !can_retry {
            return false;
        }

        tracing::debug!(screen = %self.id, "retrying load");
        self.start();
        self.host.invalidate(self.id);
        true
    }

    /// Marks the screen gone. Pending loads complete as no-ops.
    pub fn dispose(&self) {
        self.subscription.disposed.store(true, Ordering::SeqCst);
        tracing::debug!(screen = %self.id, "screen disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.subscription.disposed.load(Ordering::SeqCst)
    }

    /// Runs `f` on the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&ScreenState<T>) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    #[must_use]
    pub const fn id(&self) -> ScreenId {
        self.id
    }
}

impl<T: Clone + Send + 'static> ScreenController<T> {
    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> ScreenState<T> {
        self.with_state(ScreenState::clone)
    }
}
