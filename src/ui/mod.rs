//! Presentation layer: the template model screens produce and helpers to
//! format and print it.
//!
//! # Architecture
//!
//! ```text
//! ScreenState → Screen::template → Template → head unit (or render → text)
//! ```
//!
//! # Modules
//!
//! - [`template`]: Template, row and button types
//! - [`format`]: Currency, date and quantity formatting
//! - [`renderer`]: Plain-text rendering for the demo binary and logs

pub mod format;
pub mod renderer;
pub mod template;

pub use renderer::render;
pub use template::{
    ActionButton, HeaderAction, ListTemplate, MessageTemplate, PaneTemplate, Row, Template,
};
