//! Tracer provider that appends finished spans to a rotating JSON-lines file.

use super::file_writer::{FileWriter, RotationPolicy};
use super::span_record::SpanRecord;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry::Key;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

const UNKNOWN_SERVICE: &str = "unknown_service";

/// Writes each span of a batch as its own [`SpanRecord`] line.
struct FileSpanExporter {
    writer: FileWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, rotation: RotationPolicy, resource: &Resource) -> Self {
        Self {
            writer: FileWriter::new(file_path, rotation),
            service: service_name(resource),
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        for span in batch {
            let record = SpanRecord::from_span(&self.service, span);
            let line = serde_json::to_string(&record)
                .map_err(|e| TraceError::from(e.to_string()))?;
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.service = service_name(resource);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

fn service_name(resource: &Resource) -> String {
    resource
        .get(Key::from_static_str("service.name"))
        .map_or_else(|| UNKNOWN_SERVICE.to_string(), |value| value.to_string())
}

/// Builds a provider that exports every span synchronously to `file_path`.
///
/// ```no_run
/// use opentelemetry::KeyValue;
/// use opentelemetry_sdk::resource::Resource;
/// use tankfuel_auto::observability::{create_tracer_provider, RotationPolicy};
///
/// let resource = Resource::new(vec![KeyValue::new("service.name", "tankfuel-auto")]);
/// let provider = create_tracer_provider("/tmp/spans.jsonl".into(), RotationPolicy::default(), resource);
/// ```
pub fn create_tracer_provider(
    file_path: PathBuf,
    rotation: RotationPolicy,
    resource: Resource,
) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, rotation, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::KeyValue;

    #[test]
    fn service_name_comes_from_the_resource() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "tankfuel-auto")]);
        assert_eq!(service_name(&resource), "tankfuel-auto");
    }

    #[test]
    fn spans_are_written_one_per_line() {
        use opentelemetry::trace::{Tracer, TracerProvider as _};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let resource = Resource::new(vec![KeyValue::new("service.name", "tankfuel-test")]);
        let provider = create_tracer_provider(path.clone(), RotationPolicy::default(), resource);

        let tracer = provider.tracer("test");
        tracer.in_span("outer", |_| {
            tracer.in_span("inner", |_| {});
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let records: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "inner");
        assert_eq!(records[1]["name"], "outer");
        assert_eq!(records[0]["service"], "tankfuel-test");
        assert_eq!(records[0]["parentSpanId"], records[1]["spanId"]);
        assert!(records[1].get("parentSpanId").is_none());
    }
}
