//! Error types for the in-vehicle bridge.
//!
//! This module defines the centralized error type [`TankFuelError`] and a type alias
//! [`Result`] used throughout the crate. Most bridge failures are absorbed at the
//! [`CommandBridge`](crate::bridge::CommandBridge) boundary and replaced by fallback
//! data; the variants here are what remains visible to screens, the engine registry
//! and the configuration loaders.

use thiserror::Error;

/// The main error type for bridge, engine and screen operations.
///
/// # Examples
///
/// ```
/// use tankfuel_auto::domain::TankFuelError;
///
/// let err = TankFuelError::Remote {
///     code: "UNAVAILABLE".to_string(),
///     message: Some("database locked".to_string()),
/// };
/// assert_eq!(err.to_string(), "Remote error UNAVAILABLE: database locked");
/// ```
#[derive(Debug, Error)]
pub enum TankFuelError {
    /// No message channel to the application engine is available.
    ///
    /// Raised synchronously when engine construction or channel derivation
    /// failed earlier in the process lifetime.
    #[error("Method channel not initialized")]
    ChannelUnavailable,

    /// The remote side answered with an explicit error.
    #[error("Remote error {code}: {}", message.as_deref().unwrap_or("no message"))]
    Remote {
        /// Error code reported by the remote handler.
        code: String,
        /// Optional human-readable description.
        message: Option<String>,
    },

    /// The remote side does not implement the requested method.
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    /// The reply could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The transport discarded the reply callback without answering.
    #[error("Reply dropped: {0}")]
    ReplyDropped(String),

    /// Engine construction, channel derivation or send failed.
    #[error("Engine error: {0}")]
    Engine(String),

    /// An external navigation intent could not be launched.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payload could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized `Result` type for crate operations.
pub type Result<T> = std::result::Result<T, TankFuelError>;
