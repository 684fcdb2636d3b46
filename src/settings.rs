//! Process configuration read from the environment.
//!
//! The hook is intentionally almost configuration-free: responses are a pure
//! function of the request, so environment values are diagnostic context
//! only. Everything is read once at startup.

use std::env;

/// Environment variable naming the namespace of the companion Argo CD
/// instance.
pub const ARGO_NS_VAR: &str = "ARGO_NS";

/// Process-wide settings, read once at startup.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Namespace the companion Argo CD instance runs in, if configured.
    /// Surfaced in logs; never used when computing hook responses.
    pub argo_namespace: Option<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        let argo_namespace = env::var(ARGO_NS_VAR).ok().filter(|v| !v.is_empty());
        Self { argo_namespace }
    }
}
