//! Error types for hook request processing.
//!
//! Defines the failure taxonomy with its HTTP mapping. Not-ready and
//! opted-out conditions are not errors; they produce empty attachment sets.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::hooks::contract::ErrorResponse;
use crate::kubeconfig::KubeconfigError;

/// Error type for hook request processing
#[derive(Error, Debug)]
pub enum Error {
    /// Parent object lacking a field the hook cannot work without
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Snapshot contains secrets, but not the one declared for this parent
    #[error("related secret {0} not present in snapshot")]
    RelatedSecretMissing(String),

    /// Kubeconfig secret observed but unusable
    #[error("invalid credential secret {name}: {source}")]
    Credential {
        name: String,
        #[source]
        source: KubeconfigError,
    },

    /// Serialization failure building the registration document
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML failure building the registration payload
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// HTTP status reported to the runtime for this failure.
    ///
    /// Malformed requests are the caller's fault (400), unusable observed
    /// state fails the reconcile tick (422), and serializer failures are
    /// internal (500).
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_) => StatusCode::BAD_REQUEST,
            Error::RelatedSecretMissing(_) | Error::Credential { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Serialization(_) | Error::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Result type alias for hook processing
pub type Result<T> = std::result::Result<T, Error>;
