//! ArgoCluster Custom Resource Definition.
//!
//! An ArgoCluster represents a workload cluster that may be attached to a
//! central Argo CD instance. The hook server reads only its metadata (name,
//! namespace, labels); spec fields describe intent for the companion
//! controller and never influence hook responses.

use std::collections::BTreeMap;

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label a parent carries to opt in to Argo CD attachment. Presence of the
/// key is the gate; the value is ignored.
pub const ATTACH_LABEL: &str = "argocd-attach";

/// ArgoCluster is a custom resource describing a workload cluster to
/// register with Argo CD.
///
/// Example:
/// ```yaml
/// apiVersion: gitops.example.com/v1alpha1
/// kind: ArgoCluster
/// metadata:
///   name: demo
///   namespace: team-a
///   labels:
///     argocd-attach: "true"
/// spec:
///   argoNamespace: argocd
///   project: default
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "gitops.example.com",
    version = "v1alpha1",
    kind = "ArgoCluster",
    plural = "argoclusters",
    shortname = "ac",
    status = "ArgoClusterStatus",
    namespaced,
    // Print columns for kubectl get
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Ready", "type":"boolean", "jsonPath":".status.ready"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ArgoClusterSpec {
    /// Display name for the cluster inside Argo CD.
    /// Empty means "use the resource name".
    #[serde(default)]
    pub cluster_name: String,

    /// Namespace of the Argo CD instance this cluster attaches to.
    #[serde(default)]
    pub argo_namespace: String,

    /// Labels the companion controller applies to resources it creates for
    /// this cluster.
    #[serde(default)]
    pub cluster_labels: BTreeMap<String, String>,

    /// Argo CD project the cluster is scoped to.
    #[serde(default)]
    pub project: String,
}

/// Status of an ArgoCluster registration, written by the companion
/// controller.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArgoClusterStatus {
    /// Current registration state.
    #[serde(default)]
    pub state: RegistrationState,

    /// Human-readable detail for the current state.
    #[serde(default)]
    pub message: String,

    /// Whether the registration Secret has been declared.
    #[serde(default)]
    pub ready: bool,

    /// Last time the status was written (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// RegistrationState represents the lifecycle of a cluster registration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum RegistrationState {
    /// Initial state, registration not yet attempted.
    #[default]
    Pending,
    /// Registration Secret declared and accepted.
    Ready,
    /// Registration failed and requires intervention.
    Failed,
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationState::Pending => write!(f, "Pending"),
            RegistrationState::Ready => write!(f, "Ready"),
            RegistrationState::Failed => write!(f, "Failed"),
        }
    }
}

impl ArgoCluster {
    /// Whether this parent has opted in to attachment via the
    /// `argocd-attach` label.
    pub fn attach_requested(&self) -> bool {
        self.labels().contains_key(ATTACH_LABEL)
    }
}
