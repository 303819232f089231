//! W3C trace context propagation across the HTTP and gRPC hops.
//!
//! Outgoing gRPC calls carry the current span's `traceparent`; incoming HTTP
//! requests and gRPC calls adopt it as their parent, so the logs of both
//! services share one `trace_id`. Without the `otel` feature every function
//! here is a no-op.

use tonic::metadata::MetadataMap;
use tracing::Span;

/// Injects the current span's trace context into outgoing gRPC metadata.
pub fn inject(metadata: &mut MetadataMap) {
    #[cfg(feature = "otel")]
    otel::inject(metadata);

    #[cfg(not(feature = "otel"))]
    let _ = metadata;
}

/// Parents `span` on the trace context carried in gRPC metadata and records
/// the resulting id in the span's `trace_id` field.
pub fn accept_from_metadata(span: &Span, metadata: &MetadataMap) {
    #[cfg(feature = "otel")]
    {
        otel::set_parent(span, &otel::MetadataExtractor(metadata));
        record_trace_id(span);
    }

    #[cfg(not(feature = "otel"))]
    let _ = (span, metadata);
}

/// Parents `span` on the trace context carried in HTTP headers and records
/// the resulting id in the span's `trace_id` field.
pub fn accept_from_headers(span: &Span, headers: &http::HeaderMap) {
    #[cfg(feature = "otel")]
    {
        otel::set_parent(span, &otel::HeaderExtractor(headers));
        record_trace_id(span);
    }

    #[cfg(not(feature = "otel"))]
    let _ = (span, headers);
}

/// Returns the hex trace id `span` belongs to, if it has one.
pub fn trace_id(span: &Span) -> Option<String> {
    #[cfg(feature = "otel")]
    {
        otel::trace_id(span)
    }

    #[cfg(not(feature = "otel"))]
    {
        let _ = span;
        None
    }
}

#[cfg(feature = "otel")]
fn record_trace_id(span: &Span) {
    if let Some(id) = trace_id(span) {
        span.record("trace_id", id.as_str());
    }
}

#[cfg(feature = "otel")]
mod otel {
    use opentelemetry::global;
    use opentelemetry::propagation::{Extractor, Injector};
    use opentelemetry::trace::TraceContextExt;
    use tonic::metadata::{KeyRef, MetadataKey, MetadataMap};
    use tracing::Span;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    pub(super) fn inject(metadata: &mut MetadataMap) {
        let cx = Span::current().context();
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&cx, &mut MetadataInjector(metadata));
        });
    }

    pub(super) fn set_parent(span: &Span, carrier: &dyn Extractor) {
        let parent = global::get_text_map_propagator(|propagator| propagator.extract(carrier));
        span.set_parent(parent);
    }

    pub(super) fn trace_id(span: &Span) -> Option<String> {
        let cx = span.context();
        let span_ref = cx.span();
        let span_context = span_ref.span_context();
        span_context
            .is_valid()
            .then(|| span_context.trace_id().to_string())
    }

    struct MetadataInjector<'a>(&'a mut MetadataMap);

    impl Injector for MetadataInjector<'_> {
        fn set(&mut self, key: &str, value: String) {
            if let Ok(key) = MetadataKey::from_bytes(key.as_bytes()) {
                if let Ok(value) = value.parse() {
                    self.0.insert(key, value);
                }
            }
        }
    }

    pub(super) struct MetadataExtractor<'a>(pub(super) &'a MetadataMap);

    impl Extractor for MetadataExtractor<'_> {
        fn get(&self, key: &str) -> Option<&str> {
            self.0.get(key).and_then(|v| v.to_str().ok())
        }

        fn keys(&self) -> Vec<&str> {
            self.0
                .keys()
                .filter_map(|key| match key {
                    KeyRef::Ascii(key) => Some(key.as_str()),
                    KeyRef::Binary(_) => None,
                })
                .collect()
        }
    }

    pub(super) struct HeaderExtractor<'a>(pub(super) &'a http::HeaderMap);

    impl Extractor for HeaderExtractor<'_> {
        fn get(&self, key: &str) -> Option<&str> {
            self.0.get(key).and_then(|v| v.to_str().ok())
        }

        fn keys(&self) -> Vec<&str> {
            self.0.keys().map(|k| k.as_str()).collect()
        }
    }
}
