use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const TRACER_NAME: &str = "case-attachments";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Runtime for the OTLP gRPC exporters. Tonic's `connect_lazy()` calls
/// `tokio::spawn`, and the serve init closure may run outside a runtime context.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Set up the OpenTelemetry trace and log exporters.
///
/// Dioxus owns the tracing subscriber; this only configures OTLP export so
/// HTTP spans (via [`OtelTraceLayer`]) and `log` records reach the collector.
///
/// Reads config from environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address, e.g. `http://localhost:4317`
///   - `OTEL_SERVICE_NAME`: service name tag (default: `case-attachments`)
///   - `OTEL_INGESTION_KEY`: collector access token, sent as gRPC metadata (optional)
///   - `DEPLOY_ENV`: deployment environment tag (default: `development`)
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();

    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        eprintln!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return;
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| TRACER_NAME.to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());
    let ingestion_key = std::env::var("OTEL_INGESTION_KEY")
        .ok()
        .filter(|k| !k.is_empty());

    let rt = OTEL_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .expect("Failed to create OTEL runtime")
    });
    let _guard = rt.enter();

    let metadata = match ingestion_metadata(ingestion_key.as_deref()) {
        Ok(md) => md,
        Err(e) => {
            eprintln!("Invalid OTEL_INGESTION_KEY ({e}), skipping OTLP telemetry");
            return;
        }
    };

    let mut span_builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if endpoint.starts_with("https://") {
        span_builder = span_builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }
    if let Some(md) = metadata.clone() {
        span_builder = span_builder.with_metadata(md);
    }
    let exporter = match span_builder.build() {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Failed to create OTLP span exporter: {e}");
            return;
        }
    };

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    // -- Log exporter (uses the `log` crate, not the `tracing` subscriber) --
    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if endpoint.starts_with("https://") {
        log_builder = log_builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }
    if let Some(md) = metadata {
        log_builder = log_builder.with_metadata(md);
    }
    let log_exporter = match log_builder.build() {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Failed to create OTLP log exporter: {e}; traces only");
            return;
        }
    };

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => eprintln!("Log bridge skipped, log crate logger already set"),
    }

    eprintln!("Telemetry initialized v{APP_VERSION}, exporting traces and logs to {endpoint}");
}

fn ingestion_metadata(
    key: Option<&str>,
) -> Result<Option<opentelemetry_otlp::tonic_types::metadata::MetadataMap>, String> {
    let Some(key) = key else {
        return Ok(None);
    };
    let mut md = opentelemetry_otlp::tonic_types::metadata::MetadataMap::new();
    md.insert(
        "ingestion-key",
        key.parse().map_err(|_| "not a valid header value".to_string())?,
    );
    Ok(Some(md))
}

/// Collapse request paths into route templates so spans group by endpoint.
///
/// Record ids are caller-supplied, so `/api/records/R-17/attachments` becomes
/// `/api/records/{record_id}/attachments`.
fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        ["", "api", "records", _, "attachments"] => "/api/records/{record_id}/attachments".to_string(),
        ["", "records", _, "attachments"] => "/records/{record_id}/attachments".to_string(),
        _ => path.to_string(),
    }
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Captures method, route, request ID, the file requested from the proxy
/// route, and the response status.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(TRACER_NAME);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let route = route_template(&path);

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.target", path),
            KeyValue::new("http.request_id", request_id),
        ];
        if route == "/api/attachments/file" {
            if let Some(file) = query_param(req.uri().query(), "file_name") {
                attributes.push(KeyValue::new("blob.file_name", file));
            }
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| {
            urlencoding::decode(&value.replace('+', " "))
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
    })
}
