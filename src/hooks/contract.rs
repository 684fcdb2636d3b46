//! Wire contract between the composite-controller runtime and this hook.
//!
//! The runtime POSTs the parent (and, for sync, a snapshot of observed
//! related objects) and expects the declarations back in the same response.
//! Related objects stay untyped JSON: their usability is a reconcile-time
//! question, not a request-parsing one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::crd::ArgoCluster;
use crate::resources::ClusterSecret;

/// Body of a customize hook call.
#[derive(Clone, Debug, Deserialize)]
pub struct CustomizeRequest {
    /// The parent resource being reconciled.
    pub parent: ArgoCluster,
}

/// Reply to a customize hook call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizeResponse {
    /// Related-resource queries the runtime should resolve and watch.
    pub related_resources: Vec<ResourceRule>,
}

/// One related-resource query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRule {
    /// API version of the related resource ("v1" for core resources).
    pub api_version: String,

    /// Lowercase plural resource name (e.g. "secrets").
    pub resource: String,

    /// Namespace to query in.
    pub namespace: String,

    /// Object names to resolve.
    pub names: Vec<String>,
}

/// Body of a sync hook call.
#[derive(Clone, Debug, Deserialize)]
pub struct SyncRequest {
    /// The parent resource being reconciled.
    pub object: ArgoCluster,

    /// Observed related objects. Absent before the first related watch
    /// delivers, which reads the same as an empty snapshot.
    #[serde(default)]
    pub related: RelatedObjects,
}

/// Snapshot of observed related objects, keyed by resource type
/// (`"Secret.v1"`) and then by object name.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RelatedObjects(pub BTreeMap<String, BTreeMap<String, serde_json::Value>>);

impl RelatedObjects {
    /// Snapshot key the runtime uses for core v1 Secrets.
    pub const SECRET_V1: &'static str = "Secret.v1";

    /// Observed Secrets by name. An absent type key reads as empty.
    pub fn secrets(&self) -> &BTreeMap<String, serde_json::Value> {
        static EMPTY: BTreeMap<String, serde_json::Value> = BTreeMap::new();
        self.0.get(Self::SECRET_V1).unwrap_or(&EMPTY)
    }
}

/// Reply to a sync hook call: the full desired attachment set.
#[derive(Clone, Debug, Serialize)]
pub struct SyncResponse {
    pub attachments: Vec<ClusterSecret>,
}

/// JSON error payload returned for failures and unknown paths.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message, or "404" for unknown paths.
    pub error: String,

    /// Echo of the requested path, set only for unknown paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            endpoint: None,
        }
    }

    pub fn not_found(endpoint: impl Into<String>) -> Self {
        Self {
            error: "404".to_string(),
            endpoint: Some(endpoint.into()),
        }
    }
}
