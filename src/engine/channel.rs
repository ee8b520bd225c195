//! Message channel to the application engine.
//!
//! A channel carries named method calls to the engine and delivers exactly one
//! [`MethodReply`] per call through a callback. The callback runs on whatever
//! thread the engine answers on.

use crate::domain::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// The engine's answer to one method call.
///
/// Serialized externally tagged, which is also the fixture file format:
///
/// ```json
/// {
///   "getNearestStations": { "success": [ { "id": "1", "name": "Eni" } ] },
///   "getAveragePrices": { "error": { "code": "DB", "message": "locked" } },
///   "getVehicles": "not_implemented"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodReply {
    /// The method ran; the payload is normally a list of field maps.
    Success(Value),

    /// The method failed on the engine side.
    Error {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },

    /// The engine has no handler for the method.
    NotImplemented,
}

impl MethodReply {
    /// Shorthand for an error reply without details.
    #[must_use]
    pub fn error(code: &str, message: Option<&str>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.map(ToString::to_string),
            details: None,
        }
    }
}

/// Callback receiving the reply of one method call.
pub type ReplyCallback = Box<dyn FnOnce(MethodReply) + Send + 'static>;

/// A named channel to the engine.
///
/// Implementations must call `reply` at most once. Dropping `reply` without
/// calling it is allowed and is observed by the caller as a dropped reply.
pub trait MethodChannel: Send + Sync {
    /// Channel name the engine side listens on.
    fn name(&self) -> &str;

    /// Sends `method` with optional `arguments`.
    ///
    /// # Errors
    ///
    /// Returns an error when the call cannot be sent at all.
    fn invoke_method(&self, method: &str, arguments: Option<Value>, reply: ReplyCallback)
        -> Result<()>;
}

/// A channel shared by every bridge in the process.
pub type SharedChannel = Arc<dyn MethodChannel>;
