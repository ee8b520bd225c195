//! Request envelope carried from a channel to the local engine worker.

use crate::observability::TraceContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One method call as seen by the engine worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    /// Channel the call was sent on.
    pub channel: String,

    /// Method name, e.g. `getNearestStations`.
    pub method: String,

    /// Call arguments; the bridge never sends any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,

    /// Trace context for linking the worker span to the caller's span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl EngineRequest {
    /// Builds a request with the current span's trace context attached.
    #[must_use]
    pub fn new(channel: &str, method: &str, arguments: Option<Value>) -> Self {
        Self {
            channel: channel.to_string(),
            method: method.to_string(),
            arguments,
            trace_context: TraceContext::from_current(),
        }
    }
}
