//! TankFuel Auto: the in-vehicle side of a fuel-tracking app.
//!
//! The head unit shows list, message and pane templates. Their data lives in
//! the main application runtime, reached through a named method channel.
//! This crate provides:
//! - A shared, lazily created application engine and its method channel
//! - A typed request bridge that decodes replies and substitutes fallback data
//! - A per-screen asynchronous state machine (loading, ready, error, redirected)
//! - The concrete screens of both app variants, and an in-process host to drive them

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Entry point (main.rs)                              │  ← scripted head unit
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Host layer (host/)                                 │  ← screen stack
//! │  - CarSession, QueuedHost main-loop pump            │  ← navigation intents
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Screens (screens/) on the state machine (screen/)  │  ← Event → Action
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI (ui/)      │   │ Bridge        │   │ Engine        │
//! │ - Templates   │   │ (bridge/)     │   │ (engine/)     │
//! │ - Formatting  │   │ - Decoding    │   │ - Registry    │
//! │ - Text render │   │ - Fallbacks   │   │ - Worker      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) and Observability (observability/)│
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Entities, tolerant field decoding, error type
//! - [`engine`]: Engine lifecycle, method channels, in-process engine
//! - [`bridge`]: Typed requests with per-operation fallback policies
//! - [`screen`]: Screen state machine, events, actions and routes
//! - [`screens`]: Concrete screens and the screen factory
//! - [`host`]: Host contract, navigation and the in-process session
//! - [`ui`]: Template model, formatting and plain-text renderer
//! - [`observability`]: Tracing setup and file span export
//!
//! # Configuration
//!
//! The host passes string options, parsed by [`Config::from_host_map`]:
//!
//! ```text
//! variant=carmate
//! fixture=/data/replies.json
//! bridge_config=/data/bridge.toml
//! trace_level=debug
//! trace_file=/tmp/tankfuel/spans.jsonl
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tankfuel_auto::screen::ScreenEvent;
//! use tankfuel_auto::{initialize, ui, Config};
//!
//! let mut session = initialize(&Config::default());
//! session.dispatch(ScreenEvent::Select(0));
//! session.settle(Duration::from_millis(100));
//!
//! if let Some(template) = session.render() {
//!     println!("{}", ui::render(&template));
//! }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Failures Become Data
//!
//! Screens rarely see errors. The bridge replaces empty or failed replies with
//! fixed fallback datasets according to a [`bridge::FallbackPolicy`]. Only a
//! missing channel surfaces as an error, and only for average prices.
//!
//! ## Stale Results Are Dropped
//!
//! Every load is tied to a subscription. Disposing a screen or retrying it
//! ends the previous subscription, and results arriving for it are ignored.

pub mod bridge;
pub mod domain;
pub mod engine;
pub mod host;
pub mod observability;
pub mod screen;
pub mod screens;
pub mod ui;

pub use bridge::{BridgeConfig, CommandBridge};
pub use domain::{Result, TankFuelError};
pub use host::{CarSession, QueuedHost};
pub use screens::ScreenFactory;

use engine::{
    EngineRegistry, FixtureSource, LocalEngineFactory, ProcessContext, ReplySource,
    DEFAULT_ENGINE_ID,
};
use host::{LogNavigator, SharedHost};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// The two branded builds of the head-unit app.
///
/// They share every screen. They differ in title, package, default channel
/// name, and whether the refuelings screen is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppVariant {
    #[default]
    TankFuel,
    CarMate,
}

impl AppVariant {
    /// Parses `tankfuel` or `carmate`, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tankfuel" => Some(Self::TankFuel),
            "carmate" => Some(Self::CarMate),
            _ => None,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TankFuel => "TankFuel",
            Self::CarMate => "CarMate",
        }
    }

    #[must_use]
    pub const fn package(self) -> &'static str {
        match self {
            Self::TankFuel => "com.lorenzo.tankfuel",
            Self::CarMate => "com.example.carmate",
        }
    }

    #[must_use]
    pub const fn default_channel_name(self) -> &'static str {
        match self {
            Self::TankFuel => "com.lorenzo.tankfuel/auto",
            Self::CarMate => "com.example.carmate/auto",
        }
    }

    /// CarMate answers the refuelings entry with a "not available" message.
    #[must_use]
    pub const fn has_refuelings(self) -> bool {
        matches!(self, Self::TankFuel)
    }
}

/// Options passed by the host when the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branded build. Default: [`AppVariant::TankFuel`]
    pub variant: AppVariant,

    /// Key of the shared engine in the registry. Default: `auto_engine`
    pub engine_id: String,

    /// Name of the method channel. Default: the variant's channel name
    pub channel_name: String,

    /// JSON reply fixture served by the engine. Without one the engine
    /// serves a built-in sample.
    pub fixture: Option<String>,

    /// TOML file overriding the per-operation fallback policies.
    pub bridge_config: Option<String>,

    /// Level filter: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// JSON-lines file receiving exported spans. Export is off when unset.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_variant(AppVariant::default())
    }
}

impl Config {
    /// Default options for `variant`.
    #[must_use]
    pub fn for_variant(variant: AppVariant) -> Self {
        Self {
            variant,
            engine_id: DEFAULT_ENGINE_ID.to_string(),
            channel_name: variant.default_channel_name().to_string(),
            fixture: None,
            bridge_config: None,
            trace_level: None,
            trace_file: None,
        }
    }

    /// Parses host options with typed fallbacks.
    ///
    /// An unknown `variant` falls back to TankFuel. Blank values count as
    /// unset.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tankfuel_auto::{AppVariant, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("variant".to_string(), "carmate".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_host_map(&map);
    /// assert_eq!(config.variant, AppVariant::CarMate);
    /// assert_eq!(config.channel_name, "com.example.carmate/auto");
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn from_host_map(options: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            options
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let variant = value("variant").map_or_else(AppVariant::default, |name| {
            AppVariant::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(variant = %name, "unknown variant, using default");
                AppVariant::default()
            })
        });
        let defaults = Self::for_variant(variant);

        Self {
            variant,
            engine_id: value("engine_id").unwrap_or(defaults.engine_id),
            channel_name: value("channel_name").unwrap_or(defaults.channel_name),
            fixture: value("fixture"),
            bridge_config: value("bridge_config"),
            trace_level: value("trace_level"),
            trace_file: value("trace_file"),
        }
    }

    /// Builds the engine registry. The engine serves the configured fixture,
    /// or the built-in sample when none is set.
    #[must_use]
    pub fn engine_registry(&self) -> EngineRegistry {
        let fixture = self.fixture.clone();
        let factory = LocalEngineFactory::new(move || {
            let source = match &fixture {
                Some(path) => FixtureSource::from_file(Path::new(path))?,
                None => FixtureSource::sample(),
            };
            Ok(Box::new(source) as Box<dyn ReplySource>)
        });
        EngineRegistry::new(Box::new(factory), &self.engine_id, &self.channel_name)
    }

    /// Loads the fallback policies. A missing or invalid file logs a warning
    /// and yields the defaults.
    #[must_use]
    pub fn load_bridge_config(&self) -> BridgeConfig {
        self.bridge_config
            .as_ref()
            .map_or_else(BridgeConfig::default, |path| {
                BridgeConfig::load(Path::new(path)).unwrap_or_else(|e| {
                    tracing::warn!(path = %path, error = %e, "cannot load bridge config, using defaults");
                    BridgeConfig::default()
                })
            })
    }
}

/// Connects to the engine and opens a session on the main menu.
///
/// Engine failures do not fail the session: the bridge then runs without a
/// channel and screens show fallbacks or errors.
#[must_use]
pub fn initialize(config: &Config) -> CarSession {
    let span = tracing::debug_span!("initialize", variant = config.variant.title());
    let _guard = span.entered();

    let registry = config.engine_registry();
    let context = ProcessContext::new(config.variant.package());
    let bridge = CommandBridge::connect(&registry, &context, config.load_bridge_config());
    tracing::debug!(connected = bridge.has_channel(), "bridge ready");

    let queue = Arc::new(QueuedHost::new());
    let factory = ScreenFactory::new(config.variant, bridge, Arc::clone(&queue) as SharedHost);
    CarSession::new(factory, queue, Box::new(LogNavigator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        let config = Config::from_host_map(&BTreeMap::new());
        assert_eq!(config, Config::default());
        assert_eq!(config.engine_id, "auto_engine");
        assert_eq!(config.channel_name, "com.lorenzo.tankfuel/auto");
    }

    #[test]
    fn explicit_channel_name_wins_over_variant() {
        let config = Config::from_host_map(&options(&[
            ("variant", "CarMate"),
            ("channel_name", "custom/channel"),
        ]));
        assert_eq!(config.variant, AppVariant::CarMate);
        assert_eq!(config.channel_name, "custom/channel");
    }

    #[test]
    fn unknown_variant_and_blank_values_fall_back() {
        let config = Config::from_host_map(&options(&[
            ("variant", "truckmate"),
            ("fixture", "  "),
            ("engine_id", ""),
        ]));
        assert_eq!(config.variant, AppVariant::TankFuel);
        assert_eq!(config.fixture, None);
        assert_eq!(config.engine_id, DEFAULT_ENGINE_ID);
    }

    #[test]
    fn variants_differ_in_refuelings() {
        assert!(AppVariant::TankFuel.has_refuelings());
        assert!(!AppVariant::CarMate.has_refuelings());
        assert_eq!(AppVariant::from_name("TANKFUEL"), Some(AppVariant::TankFuel));
    }

    #[test]
    fn missing_bridge_config_file_uses_defaults() {
        let config = Config {
            bridge_config: Some("/nonexistent/bridge.toml".to_string()),
            ..Config::default()
        };
        assert_eq!(config.load_bridge_config(), BridgeConfig::default());
    }

    #[test]
    fn unreadable_fixture_leaves_registry_without_channel() {
        let config = Config {
            fixture: Some("/nonexistent/replies.json".to_string()),
            ..Config::default()
        };
        let registry = config.engine_registry();
        let context = ProcessContext::new(config.variant.package());
        assert!(registry.acquire_channel(&context).is_none());
        assert!(!registry.is_initialized());
    }
}
