//! Hook HTTP server.
//!
//! Serves the two composite-controller hooks:
//! - `POST /customize` - declare related-resource queries for a parent
//! - `POST /sync` - declare the desired attachment set for a parent
//!
//! Every other path returns a 404 payload echoing the path. The server is
//! stateless between requests; handlers only read shared settings and
//! record metrics.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{debug, info, warn};

use crate::controller::customize::related_resource_rules;
use crate::controller::sync::{desired_attachments, parent_identity};
use crate::health::HealthState;
use crate::hooks::contract::{
    CustomizeRequest, CustomizeResponse, ErrorResponse, SyncRequest, SyncResponse,
};
use crate::settings::Settings;

/// Default hook server port
pub const HOOK_PORT: u16 = 8080;

/// Shared state for hook handlers
pub struct HookState {
    /// Process settings; diagnostic only, responses never depend on them.
    pub settings: Settings,
    /// Shared health and metrics state.
    pub health: Arc<HealthState>,
}

impl HookState {
    pub fn new(settings: Settings, health: Arc<HealthState>) -> Self {
        Self { settings, health }
    }
}

/// Create the hook router
pub fn create_hook_router(state: Arc<HookState>) -> Router {
    debug!(argo_namespace = ?state.settings.argo_namespace, "Building hook router");
    Router::new()
        .route("/customize", post(customize_hook))
        .route("/sync", post(sync_hook))
        .fallback(unknown_path)
        .with_state(state)
}

/// Customize hook handler
async fn customize_hook(
    State(state): State<Arc<HookState>>,
    Json(request): Json<CustomizeRequest>,
) -> Response {
    let (name, namespace) = match parent_identity(&request.parent) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(error = %e, "Rejecting customize request");
            return e.into_response();
        }
    };

    state.health.metrics.record_customize(&namespace, &name);
    info!(name = %name, namespace = %namespace, "Customize hook");

    let response = CustomizeResponse {
        related_resources: related_resource_rules(&name, &namespace),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Sync hook handler
async fn sync_hook(
    State(state): State<Arc<HookState>>,
    Json(request): Json<SyncRequest>,
) -> Response {
    let started = Instant::now();

    let (name, namespace) = match parent_identity(&request.object) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(error = %e, "Rejecting sync request");
            return e.into_response();
        }
    };

    match desired_attachments(&request.object, &request.related) {
        Ok(attachments) => {
            let metrics = &state.health.metrics;
            metrics.record_sync(&namespace, &name, started.elapsed().as_secs_f64());
            metrics.record_attachments(&namespace, &name, attachments.len() as u64);
            state.health.touch_last_sync();

            info!(
                name = %name,
                namespace = %namespace,
                attachments = attachments.len(),
                "Sync hook"
            );
            (StatusCode::OK, Json(SyncResponse { attachments })).into_response()
        }
        Err(e) => {
            state.health.metrics.record_sync_error(&namespace, &name);
            warn!(name = %name, namespace = %namespace, error = %e, "Sync hook failed");
            e.into_response()
        }
    }
}

/// Fallback handler for unknown paths
async fn unknown_path(State(state): State<Arc<HookState>>, uri: Uri) -> Response {
    state.health.metrics.record_unknown_path();
    warn!(path = %uri.path(), "Unknown hook path");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found(uri.path())),
    )
        .into_response()
}

/// Run the hook server
///
/// Binds to 0.0.0.0:8080 and serves the customize and sync hooks.
pub async fn run_hook_server(state: Arc<HookState>) -> Result<(), std::io::Error> {
    let app = create_hook_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], HOOK_PORT));
    info!(port = HOOK_PORT, "Starting hook server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
