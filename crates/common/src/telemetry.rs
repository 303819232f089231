//! Tracing subscriber setup shared by both service binaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for log lines, selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default).
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` from the environment; anything but `json` is pretty.
    pub fn from_env() -> Self {
        Self::parse(crate::env::var("LOG_FORMAT").as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The OTLP span exporter could not be built.
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),
}

/// Handle to the installed tracing pipeline.
///
/// Call [`Telemetry::shutdown`] before exiting so buffered spans reach the
/// collector.
pub struct Telemetry {
    #[cfg(feature = "otel")]
    provider: opentelemetry_sdk::trace::TracerProvider,
}

impl Telemetry {
    /// Flushes and stops span export.
    pub fn shutdown(self) {
        #[cfg(feature = "otel")]
        if let Err(err) = self.provider.shutdown() {
            tracing::warn!(error = %err, "failed to shut down tracer provider");
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `default_directive`.
/// With the `otel` feature, spans also carry OpenTelemetry contexts so
/// `trace_id` can cross service boundaries (see [`crate::trace_context`]),
/// and are exported over OTLP when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
/// Must be called once, inside the Tokio runtime, before any component is
/// constructed.
pub fn init(service: &'static str, default_directive: &str) -> Result<Telemetry, TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let format = LogFormat::from_env();
    let json = (format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_current_span(true));
    let pretty = (format == LogFormat::Pretty).then(|| tracing_subscriber::fmt::layer());

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty);

    #[cfg(feature = "otel")]
    let telemetry = {
        use opentelemetry::trace::TracerProvider as _;

        opentelemetry::global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );
        let provider = otel::tracer_provider(service)?;
        registry
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(service)))
            .init();
        Telemetry { provider }
    };

    #[cfg(not(feature = "otel"))]
    let telemetry = {
        registry.init();
        Telemetry {}
    };

    tracing::info!(service, ?format, "tracing initialized");
    Ok(telemetry)
}

#[cfg(feature = "otel")]
mod otel {
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::Resource;
    use opentelemetry_sdk::trace::{Config, TracerProvider};

    use super::TelemetryError;

    /// Spans always get sampled contexts so trace ids show up in logs; the
    /// batch exporter is only attached when a collector endpoint is set.
    pub(super) fn tracer_provider(
        service: &'static str,
    ) -> Result<TracerProvider, TelemetryError> {
        let resource = Resource::new(vec![KeyValue::new("service.name", service)]);
        let mut builder =
            TracerProvider::builder().with_config(Config::default().with_resource(resource));

        if let Some(endpoint) = crate::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
            builder = builder.with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_json_case_insensitively() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("text")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
    }
}
