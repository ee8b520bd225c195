//! Screen lifecycle states.
//!
//! ```text
//!             ┌──────── retry ────────┐
//!             ▼                       │
//! start ─▶ Loading ─┬─▶ Ready(data)   │
//!                   ├─▶ Error(reason) ┤
//!                   └─▶ Redirected ───┘
//! ```
//!
//! `Redirected` is reached when the load decided to push another screen
//! instead of showing data, like the refuelings list without vehicles.

use super::actions::Route;

/// Fixed reason used when a failure carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Current state of a data-backed screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Loading,
    Ready(T),
    Error(String),
    Redirected,
}

impl<T> ScreenState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Error reason, when in the error state.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&T> {
        match self {
            Self::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether a retry may restart the load from here.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Redirected)
    }
}

/// Result of one load, handed to a
/// [`Completion`](super::controller::Completion).
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Ready(T),
    Failed(String),
    /// Push `Route` instead of showing data.
    Redirect(Route),
}

impl<T> LoadOutcome<T> {
    /// Failure outcome; an empty reason becomes [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            Self::Failed(UNKNOWN_ERROR.to_string())
        } else {
            Self::Failed(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_failure_reason_is_unknown_error() {
        assert_eq!(LoadOutcome::<()>::failed("  "), LoadOutcome::Failed(UNKNOWN_ERROR.to_string()));
        assert_eq!(LoadOutcome::<()>::failed("boom"), LoadOutcome::Failed("boom".to_string()));
    }

    #[test]
    fn only_settled_failures_can_retry() {
        assert!(!ScreenState::<()>::Loading.can_retry());
        assert!(!ScreenState::Ready(()).can_retry());
        assert!(ScreenState::<()>::Error("x".to_string()).can_retry());
        assert!(ScreenState::<()>::Redirected.can_retry());
    }
}
