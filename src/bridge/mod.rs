//! Cross-runtime data bridge.
//!
//! # Organization
//!
//! - [`operation`]: The four named remote operations
//! - [`policy`]: Per-operation fallback policy and its TOML form
//! - [`fallback`]: Local data sets used as substitutes
//! - [`decode`]: Tolerant reply decoding
//! - [`promise`]: Single-assignment request results
//! - [`command`]: The [`CommandBridge`] itself

pub mod command;
pub mod decode;
pub mod fallback;
pub mod operation;
pub mod policy;
pub mod promise;

pub use command::CommandBridge;
pub use decode::{decode_reply, RemoteEntity};
pub use fallback::FallbackCause;
pub use operation::Operation;
pub use policy::{BridgeConfig, FallbackPolicy};
pub use promise::{Promise, RemoteResult};
