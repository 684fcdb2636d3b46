//! argocd-attach-webhook - reconciliation hooks that attach workload
//! clusters to Argo CD.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Reads process settings from the environment
//! - Starts the hook server and the health/metrics server

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use argocd_attach_webhook::health::{HealthState, run_health_server};
use argocd_attach_webhook::hooks::{HookState, run_hook_server};
use argocd_attach_webhook::settings::Settings;

/// Grace period for in-flight hook calls to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("argocd_attach_webhook=info".parse()?),
        )
        .json()
        .init();

    info!("Starting argocd-attach-webhook");

    let settings = Settings::from_env();
    match &settings.argo_namespace {
        Some(ns) => info!(argo_namespace = %ns, "Argo CD namespace configured"),
        None => warn!("ARGO_NS not set, Argo CD namespace unknown"),
    }

    // Create shared health state
    let health_state = Arc::new(HealthState::new());
    let hook_state = Arc::new(HookState::new(settings, health_state.clone()));

    // Start health server first so probes work while hooks come up
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let hook_handle = tokio::spawn(async move {
        if let Err(e) = run_hook_server(hook_state).await {
            error!("Hook server error: {}", e);
        }
    });

    // Hooks are stateless; once both listeners are spawned we are ready
    health_state.set_ready(true).await;

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = hook_handle => {
            if let Err(e) = result {
                error!("Hook server task panicked: {}", e);
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready to stop receiving new work
            health_state.set_ready(false).await;
            info!("Marked hook server as not ready");

            // Give in-flight hook calls time to complete
            info!(
                "Waiting {}s for in-flight hook calls to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Hook server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the process cannot shut
/// down gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
