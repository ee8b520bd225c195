//! Subscriber setup: env filter, stderr log lines and optional span export.

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported on every exported span.
pub const SERVICE_NAME: &str = "tankfuel-auto";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// The filter is `RUST_LOG` when set, else `config.trace_level`, else `info`.
/// Log lines go to stderr. When `config.trace_file` is set, spans are also
/// exported to that file as JSON lines, which is what makes
/// [`TraceContext`](super::TraceContext) available to engine requests.
///
/// Calling it again is harmless: only the first subscriber is kept.
///
/// ```no_run
/// use tankfuel_auto::{observability::init_tracing, Config};
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let mut export_error = None;
    let otel_layer = config.trace_file.as_deref().and_then(|file| {
        let path = Path::new(file);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                export_error = Some(format!("{}: {e}", parent.display()));
                return None;
            }
        }

        let resource = Resource::new(vec![opentelemetry::KeyValue::new(
            "service.name",
            SERVICE_NAME,
        )]);
        let provider =
            tracer::create_tracer_provider(path.to_path_buf(), RotationPolicy::default(), resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed {
        if let Some(error) = export_error {
            tracing::warn!(%error, "span export disabled");
        }
    }
}
