//! argocd-attach-webhook library crate.
//!
//! This module exports the hook server, the decision logic behind it, the
//! ArgoCluster CRD, and the registration Secret generator.

pub mod controller;
pub mod crd;
pub mod health;
pub mod hooks;
pub mod kubeconfig;
pub mod resources;
pub mod settings;

pub use health::{HEALTH_PORT, HealthState, run_health_server};
pub use hooks::{HOOK_PORT, HookState, create_hook_router, run_hook_server};
pub use settings::Settings;
