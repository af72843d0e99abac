use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field, warn};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-rest";

/// OpenTelemetry providers which export data to a collector in the background
pub struct OtelExporters {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

/// Keeps the OpenTelemetry providers around so buffered data can be flushed on shutdown
pub struct TelemetryGuard {
    exporters: Option<OtelExporters>,
}

impl TelemetryGuard {
    /// Flushes and stops the OpenTelemetry exporters, if any were started
    pub fn shutdown(self) {
        let Some(exporters) = self.exporters else {
            return;
        };

        if let Err(err) = exporters.tracer_provider.shutdown() {
            warn!("Failed to flush trace exporter: {err}");
        }
        if let Err(err) = exporters.meter_provider.shutdown() {
            warn!("Failed to flush metrics exporter: {err}");
        }
    }
}

/// Attaches a middleware layer to the given router which opens a span for every request,
/// continuing any trace started by the caller
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let req_span = debug_span!(
                        "request",
                        method = &request.method().as_str(),
                        path = request.uri().path(),
                        response_status = field::Empty,
                    );

                    req_span.set_parent(global::get_text_map_propagator(|propagator| {
                        propagator.extract(&HeaderExtractor(request.headers()))
                    }));

                    req_span
                })
                .on_response(
                    |response: &Response<Body>, latency: Duration, span: &Span| {
                        span.record("response_status", field::display(response.status()));
                        debug!(latency_ms = latency.as_millis() as u64, "request processing complete");
                    },
                ),
        ),
    )
}

/// Instantiates OpenTelemetry exporters which send spans and metrics to opentelemetry-compatible
/// gRPC endpoints (typically http://localhost:4317 with a standard sidecar setup). Must be called
/// from within the tokio runtime.
pub fn init_exporters(endpoints: &app_env::OtelEndpoints) -> Result<OtelExporters, anyhow::Error> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.span_url.as_str())
        .build()
        .context("building the span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.metric_url.as_str())
        .build()
        .context("building the metrics exporter")?;

    let metrics_reader = PeriodicReader::builder(meter_export, runtime::Tokio).build();

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(metrics_reader)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();

    Ok(OtelExporters {
        tracer_provider,
        meter_provider,
    })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("parsing the {} environment variable", app_env::LOG_LEVEL))
}

/// Sets up the global logging and tracing sinks. All spans and metrics at the "debug" level and above
/// are sent to OpenTelemetry if [otel_exporters] is provided. [env_filter] is applied only to the
/// JSON logger printing to stdout. The "log" crate is bridged in as well, so sqlx's own logging
/// shows up alongside ours.
pub fn setup_logging_and_tracing(
    env_filter: EnvFilter,
    otel_exporters: Option<OtelExporters>,
) -> TelemetryGuard {
    global::set_text_map_propagator(TraceContextPropagator::new());

    if let Some(ref exporters) = otel_exporters {
        let tracer = exporters.tracer_provider.tracer(SERVICE_NAME);
        registry()
            .with(LevelFilter::DEBUG)
            .with(OpenTelemetryLayer::new(tracer))
            .with(MetricsLayer::new(exporters.meter_provider.clone()))
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        registry()
            .with(LevelFilter::DEBUG)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init();
    }

    TelemetryGuard {
        exporters: otel_exporters,
    }
}
