//! Host template model.
//!
//! Screens describe what to show as a [`Template`]. The head unit owns the
//! layout and styling; a template only carries text, rows and the events
//! their buttons raise. Templates are plain values so they can be compared in
//! tests and printed by the [`renderer`](super::renderer).
//!
//! # Example
//!
//! ```rust
//! use tankfuel_auto::screen::ScreenEvent;
//! use tankfuel_auto::ui::{ActionButton, Template};
//!
//! let template = Template::message("Error", "An error occurred: timeout")
//!     .with_action(ActionButton::new("Retry", ScreenEvent::Retry));
//! assert_eq!(template.title(), "Error");
//! ```

use crate::screen::ScreenEvent;

/// Button in a message, pane or action strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub title: String,
    pub event: ScreenEvent,
}

impl ActionButton {
    #[must_use]
    pub fn new(title: &str, event: ScreenEvent) -> Self {
        Self {
            title: title.to_string(),
            event,
        }
    }
}

/// One list or pane row: a title and up to a few lines of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub texts: Vec<String>,

    /// Whether selecting the row raises [`ScreenEvent::Select`].
    pub selectable: bool,
}

impl Row {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            texts: Vec::new(),
            selectable: false,
        }
    }

    #[must_use]
    pub fn text(mut self, line: impl Into<String>) -> Self {
        self.texts.push(line.into());
        self
    }

    #[must_use]
    pub const fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }
}

/// Header button shown left of the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Root screens show the application icon.
    AppIcon,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTemplate {
    pub title: String,
    pub header: HeaderAction,
    pub rows: Vec<Row>,
    /// Action strip in the top corner.
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub title: String,
    pub header: HeaderAction,
    pub message: String,
    pub actions: Vec<ActionButton>,
}

/// Key-value detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTemplate {
    pub title: String,
    pub header: HeaderAction,
    pub rows: Vec<Row>,
    pub actions: Vec<ActionButton>,
}

/// What a screen asks the head unit to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    List(ListTemplate),
    Message(MessageTemplate),
    Pane(PaneTemplate),
}

impl Template {
    #[must_use]
    pub fn list(title: &str, rows: Vec<Row>) -> Self {
        Self::List(ListTemplate {
            title: title.to_string(),
            header: HeaderAction::Back,
            rows,
            actions: Vec::new(),
        })
    }

    #[must_use]
    pub fn message(title: &str, message: &str) -> Self {
        Self::Message(MessageTemplate {
            title: title.to_string(),
            header: HeaderAction::Back,
            message: message.to_string(),
            actions: Vec::new(),
        })
    }

    #[must_use]
    pub fn pane(title: &str, rows: Vec<Row>) -> Self {
        Self::Pane(PaneTemplate {
            title: title.to_string(),
            header: HeaderAction::Back,
            rows,
            actions: Vec::new(),
        })
    }

    /// Adds a button to the message, the pane or the list's action strip.
    #[must_use]
    pub fn with_action(mut self, action: ActionButton) -> Self {
        match &mut self {
            Self::List(t) => t.actions.push(action),
            Self::Message(t) => t.actions.push(action),
            Self::Pane(t) => t.actions.push(action),
        }
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderAction) -> Self {
        match &mut self {
            Self::List(t) => t.header = header,
            Self::Message(t) => t.header = header,
            Self::Pane(t) => t.header = header,
        }
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::List(t) => &t.title,
            Self::Message(t) => &t.title,
            Self::Pane(t) => &t.title,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::List(t) => &t.rows,
            Self::Pane(t) => &t.rows,
            Self::Message(_) => &[],
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[ActionButton] {
        match self {
            Self::List(t) => &t.actions,
            Self::Message(t) => &t.actions,
            Self::Pane(t) => &t.actions,
        }
    }

    /// Message text of a message template.
    #[must_use]
    pub fn message_text(&self) -> Option<&str> {
        match self {
            Self::Message(t) => Some(&t.message),
            _ => None,
        }
    }
}
