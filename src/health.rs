//! Health server for Kubernetes probes and Prometheus metrics.
//!
//! Provides:
//! - `/healthz` - Liveness probe (always returns 200 if server is running)
//! - `/readyz` - Readiness probe (returns 200 when ready to serve traffic)
//! - `/metrics` - Prometheus metrics endpoint

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tracing::info;

/// Default health server port
pub const HEALTH_PORT: u16 = 8081;

/// Labels for per-parent hook metrics (namespace + name)
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct HookLabels {
    pub namespace: String,
    pub name: String,
}

impl EncodeLabelSet for HookLabels {
    fn encode(&self, mut encoder: LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("namespace", self.namespace.as_str()).encode(encoder.encode_label())?;
        ("name", self.name.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Shared metrics for the hook server
pub struct Metrics {
    /// Total sync hook calls counter
    pub syncs_total: Family<HookLabels, Counter>,
    /// Failed sync hook calls counter
    pub sync_errors_total: Family<HookLabels, Counter>,
    /// Sync hook duration histogram
    pub sync_duration_seconds: Family<HookLabels, Histogram>,
    /// Total customize hook calls counter
    pub customizes_total: Family<HookLabels, Counter>,
    /// Attachments declared in sync responses
    pub attachments_declared: Family<HookLabels, Counter>,
    /// Requests for paths outside the hook contract
    pub unknown_paths_total: Counter,
    /// Prometheus registry
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with registered metrics
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let syncs_total = Family::<HookLabels, Counter>::default();
        registry.register(
            "argocd_attach_syncs",
            "Total number of sync hook calls",
            syncs_total.clone(),
        );

        let sync_errors_total = Family::<HookLabels, Counter>::default();
        registry.register(
            "argocd_attach_sync_errors",
            "Total number of failed sync hook calls",
            sync_errors_total.clone(),
        );

        let sync_duration_seconds = Family::<HookLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 15))
        });
        registry.register(
            "argocd_attach_sync_duration_seconds",
            "Duration of sync hook calls in seconds",
            sync_duration_seconds.clone(),
        );

        let customizes_total = Family::<HookLabels, Counter>::default();
        registry.register(
            "argocd_attach_customizes",
            "Total number of customize hook calls",
            customizes_total.clone(),
        );

        let attachments_declared = Family::<HookLabels, Counter>::default();
        registry.register(
            "argocd_attach_attachments_declared",
            "Total number of attachments declared in sync responses",
            attachments_declared.clone(),
        );

        let unknown_paths_total = Counter::default();
        registry.register(
            "argocd_attach_unknown_paths",
            "Total number of requests for paths outside the hook contract",
            unknown_paths_total.clone(),
        );

        Self {
            syncs_total,
            sync_errors_total,
            sync_duration_seconds,
            customizes_total,
            attachments_declared,
            unknown_paths_total,
            registry,
        }
    }

    /// Record a successful sync hook call
    pub fn record_sync(&self, namespace: &str, name: &str, duration_secs: f64) {
        let labels = HookLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.syncs_total.get_or_create(&labels).inc();
        self.sync_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Record a failed sync hook call
    pub fn record_sync_error(&self, namespace: &str, name: &str) {
        let labels = HookLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.sync_errors_total.get_or_create(&labels).inc();
    }

    /// Record a customize hook call
    pub fn record_customize(&self, namespace: &str, name: &str) {
        let labels = HookLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.customizes_total.get_or_create(&labels).inc();
    }

    /// Record the number of attachments declared in a sync response
    pub fn record_attachments(&self, namespace: &str, name: &str, count: u64) {
        let labels = HookLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.attachments_declared.get_or_create(&labels).inc_by(count);
    }

    /// Record a request for a path outside the hook contract
    pub fn record_unknown_path(&self) {
        self.unknown_paths_total.inc();
    }

    /// Encode metrics to Prometheus text format
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// Shared state for the health server
pub struct HealthState {
    /// Whether the hook server is up and accepting requests
    ready: RwLock<bool>,
    /// Metrics registry
    pub metrics: Metrics,
    /// Last successful sync timestamp (Unix epoch seconds)
    pub last_sync: AtomicU64,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (starts as not ready)
    pub fn new() -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::new(),
            last_sync: AtomicU64::new(0),
        }
    }

    /// Mark the hook server as ready or not ready
    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    /// Check if the hook server is ready
    pub async fn is_ready(&self) -> bool {
        *self.ready.read().await
    }

    /// Record the wall-clock time of the latest successful sync
    pub fn touch_last_sync(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.last_sync.store(now, Ordering::Relaxed);
    }
}

/// Liveness probe handler
///
/// Returns 200 OK if the process is alive.
/// This is a simple check - if we can respond, we're alive.
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe handler
///
/// Returns 200 OK if the hook server is ready to serve.
/// Returns 503 Service Unavailable if not ready.
async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    if state.is_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// Metrics handler
async fn metrics_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let body = state.metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Create the health server router
pub fn create_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Run the health server
///
/// Binds to 0.0.0.0:8081 and serves health/metrics endpoints.
pub async fn run_health_server(state: Arc<HealthState>) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], HEALTH_PORT));
    info!(port = HEALTH_PORT, "Starting health server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
