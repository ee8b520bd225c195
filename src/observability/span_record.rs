//! Flat JSON form of an exported span.
//!
//! Each finished span becomes one [`SpanRecord`], written as one JSON line:
//!
//! ```json
//! {"service":"tankfuel-auto","traceId":"4bf9…","spanId":"00f0…","parentSpanId":"a3ce…",
//!  "name":"bridge_request","startUnixNano":1700000000000000000,"durationMicros":412,
//!  "attributes":{"operation":"getVehicles"},"status":"unset"}
//! ```

use opentelemetry::trace::{SpanId, Status};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub service: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start_unix_nano: u64,
    pub duration_micros: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRecord>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

/// A `tracing` event recorded inside a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub offset_micros: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl SpanRecord {
    pub fn from_span(service: &str, span: &SpanData) -> Self {
        let (status, status_message) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };

        let events = span
            .events
            .iter()
            .map(|event| EventRecord {
                name: event.name.to_string(),
                offset_micros: micros_between(span.start_time, event.timestamp),
                attributes: attribute_map(&event.attributes),
            })
            .collect();

        Self {
            service: service.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            name: span.name.to_string(),
            start_unix_nano: unix_nanos(span.start_time),
            duration_micros: micros_between(span.start_time, span.end_time),
            attributes: attribute_map(&span.attributes),
            events,
            status,
            status_message,
        }
    }
}

fn attribute_map(attributes: &[opentelemetry::KeyValue]) -> BTreeMap<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

/// Converts an attribute to plain JSON. Arrays are kept as their display text.
pub fn attribute_value(value: &opentelemetry::Value) -> JsonValue {
    use opentelemetry::Value;

    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => JsonValue::from(*f),
        other => JsonValue::String(other.to_string()),
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    let nanos = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

fn micros_between(start: SystemTime, end: SystemTime) -> u64 {
    let micros = end.duration_since(start).unwrap_or(Duration::ZERO).as_micros();
    u64::try_from(micros).unwrap_or(u64::MAX)
}
