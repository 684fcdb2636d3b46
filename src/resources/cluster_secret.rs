//! Argo CD cluster registration Secret generation.
//!
//! Builds the Secret that Argo CD's cluster discovery consumes: an Opaque
//! Secret labeled `argocd.argoproj.io/secret-type: cluster` whose payload is
//! a registration document carrying the API server endpoint and the client
//! certificate bundle from the source kubeconfig.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::controller::error::Result;
use crate::kubeconfig::ClusterCredentials;

/// Label key Argo CD watches to discover cluster Secrets.
pub const CLUSTER_SECRET_LABEL_KEY: &str = "argocd.argoproj.io/secret-type";

/// Label value marking a Secret as a cluster registration.
pub const CLUSTER_SECRET_LABEL_VALUE: &str = "cluster";

/// Name of the kubeconfig Secret expected alongside a parent.
pub fn kubeconfig_secret_name(name: &str) -> String {
    format!("{name}-kubeconfig")
}

/// Name of the registration Secret declared for a parent.
pub fn cluster_secret_name(name: &str) -> String {
    format!("{name}-argo-cluster")
}

// ============================================================================
// Argo CD registration document types
// ============================================================================

/// TLS material for the registration. All fields stay base64, exactly as
/// they appeared in the source kubeconfig.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientConfig {
    pub ca_data: String,
    pub cert_data: String,
    pub key_data: String,
}

/// Connection config embedded in the registration document. Argo CD expects
/// this as a JSON string inside the `config` field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgoClusterConfig {
    pub tls_client_config: TlsClientConfig,
}

/// The registration document wrapped in the Secret payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRegistration {
    /// Cluster display name inside Argo CD.
    pub name: String,

    /// Whether Argo CD may manage cluster-scoped resources. Argo CD reads
    /// this as a string, not a boolean.
    pub cluster_resources: String,

    /// API server endpoint of the workload cluster.
    pub server: String,

    /// JSON-serialized [`ArgoClusterConfig`].
    pub config: String,
}

// ============================================================================
// Secret manifest
// ============================================================================

/// Secret manifest declared as a desired attachment.
///
/// `data` carries the whole registration document as one base64 string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSecret {
    /// API version is always "v1".
    pub api_version: String,

    /// Kind is always "Secret".
    pub kind: String,

    /// Standard object metadata.
    pub metadata: ObjectMeta,

    /// Secret type is always "Opaque".
    #[serde(rename = "type")]
    pub secret_type: String,

    /// Base64-encoded registration document.
    pub data: String,
}

/// Generate the registration Secret for a parent.
///
/// The payload is assembled inner-to-outer: the TLS config is serialized to
/// JSON, embedded in the registration document, which is serialized to YAML
/// and base64-encoded. Field order is fixed by the struct declarations, so
/// identical inputs always produce identical bytes.
pub fn generate_cluster_secret(
    name: &str,
    namespace: &str,
    credentials: &ClusterCredentials,
) -> Result<ClusterSecret> {
    let config = ArgoClusterConfig {
        tls_client_config: TlsClientConfig {
            ca_data: credentials.ca_data.clone(),
            cert_data: credentials.cert_data.clone(),
            key_data: credentials.key_data.clone(),
        },
    };

    let registration = ClusterRegistration {
        name: name.to_string(),
        cluster_resources: "true".to_string(),
        server: credentials.server.clone(),
        config: serde_json::to_string(&config)?,
    };

    let payload = serde_yaml::to_string(&registration)?;

    let mut labels = BTreeMap::new();
    labels.insert(
        CLUSTER_SECRET_LABEL_KEY.to_string(),
        CLUSTER_SECRET_LABEL_VALUE.to_string(),
    );

    Ok(ClusterSecret {
        api_version: "v1".to_string(),
        kind: "Secret".to_string(),
        metadata: ObjectMeta {
            name: Some(cluster_secret_name(name)),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        secret_type: "Opaque".to_string(),
        data: STANDARD.encode(payload.as_bytes()),
    })
}
