//! Logging and span export.
//!
//! Everything logs through `tracing`. The subscriber prints compact lines to
//! stderr and, when a trace file is configured, exports finished spans to it
//! through OpenTelemetry:
//!
//! ```text
//! tracing spans → tracing-opentelemetry → FileSpanExporter → spans.jsonl (+ .1, .2, .3)
//! ```
//!
//! Engine requests carry a [`TraceContext`] so the span that serves a request
//! on the engine thread joins the trace of the screen that asked for it.
//!
//! # Configuration
//!
//! 1. `RUST_LOG`, when set
//! 2. `trace_level` host option
//! 3. `info`
//!
//! # Modules
//!
//! - [`context`]: Trace ids carried across the engine boundary
//! - [`init`]: Subscriber setup
//! - [`tracer`]: File-backed tracer provider
//! - [`span_record`]: JSON-lines form of a span
//! - [`file_writer`]: Size-rotated line writer

pub mod context;
pub mod file_writer;
pub mod init;
pub mod span_record;
pub mod tracer;

pub use context::TraceContext;
pub use file_writer::RotationPolicy;
pub use init::{init_tracing, SERVICE_NAME};
pub use tracer::create_tracer_provider;
