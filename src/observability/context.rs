//! Trace context propagation across the engine boundary.
//!
//! Requests to the application engine are served on another thread. The
//! requesting span's ids travel with the request so the serving span can be
//! linked to it.

use serde::{Deserialize, Serialize};

/// OpenTelemetry ids captured from the span that issued a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Trace id as 32 hex digits.
    pub trace_id: String,

    /// Span id of the requesting span as 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the ids of the current span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// is not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Attaches this context as the remote parent on the current thread.
    ///
    /// The returned guard must be held while the serving span is open.
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }
}
