//! Kubeconfig recovery from Secret payloads.
//!
//! The runtime hands the hook a snapshot of each related Secret as a raw
//! JSON object. The kubeconfig Secret carries its whole kubeconfig as a
//! single base64 string in `data`; this module decodes it and extracts the
//! certificate bundle needed to register the cluster.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;

/// Errors recovering a kubeconfig from a Secret payload.
#[derive(Error, Debug)]
pub enum KubeconfigError {
    /// Secret object has no `data` field
    #[error("secret has no data field")]
    MissingData,

    /// Secret `data` is not a base64 string
    #[error("secret data is not a base64 string")]
    DataNotString,

    /// Secret `data` is not valid base64
    #[error("invalid base64 in secret data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded payload is not a kubeconfig
    #[error("invalid kubeconfig YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Kubeconfig has an empty `clusters` list
    #[error("kubeconfig has no cluster entries")]
    NoClusters,

    /// Kubeconfig has an empty `users` list
    #[error("kubeconfig has no user entries")]
    NoUsers,

    /// First cluster entry is missing a required field
    #[error("cluster entry missing {0}")]
    MissingClusterField(&'static str),

    /// First user entry is missing a required field
    #[error("user entry missing {0}")]
    MissingUserField(&'static str),
}

/// Minimal kubeconfig model: only the entries needed for registration.
/// Unknown fields (contexts, preferences, extensions) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Kubeconfig {
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default)]
    pub users: Vec<NamedUser>,
}

/// One entry in the kubeconfig `clusters` list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster: ClusterEndpoint,
}

/// Endpoint details for a named cluster.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClusterEndpoint {
    pub server: Option<String>,
    #[serde(rename = "certificate-authority-data")]
    pub certificate_authority_data: Option<String>,
}

/// One entry in the kubeconfig `users` list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NamedUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: UserCredentials,
}

/// Client certificate material for a named user.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserCredentials {
    #[serde(rename = "client-certificate-data")]
    pub client_certificate_data: Option<String>,
    #[serde(rename = "client-key-data")]
    pub client_key_data: Option<String>,
}

/// Certificate bundle extracted from a kubeconfig. All `*_data` fields stay
/// in their base64 form; they are re-embedded verbatim in the registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterCredentials {
    pub server: String,
    pub ca_data: String,
    pub cert_data: String,
    pub key_data: String,
}

impl Kubeconfig {
    /// Recover a kubeconfig from a Secret object as observed by the runtime.
    /// `data` must be a single base64 string wrapping kubeconfig YAML.
    pub fn from_secret_value(secret: &serde_json::Value) -> Result<Self, KubeconfigError> {
        let data = secret.get("data").ok_or(KubeconfigError::MissingData)?;
        let encoded = data.as_str().ok_or(KubeconfigError::DataNotString)?;
        let bytes = STANDARD.decode(encoded)?;
        Ok(serde_yaml::from_slice(&bytes)?)
    }

    /// Extract registration credentials from the first cluster and the first
    /// user entry. Additional entries are ignored.
    pub fn primary_credentials(&self) -> Result<ClusterCredentials, KubeconfigError> {
        let cluster = self.clusters.first().ok_or(KubeconfigError::NoClusters)?;
        let user = self.users.first().ok_or(KubeconfigError::NoUsers)?;

        let server = cluster
            .cluster
            .server
            .clone()
            .ok_or(KubeconfigError::MissingClusterField("server"))?;
        let ca_data = cluster
            .cluster
            .certificate_authority_data
            .clone()
            .ok_or(KubeconfigError::MissingClusterField(
                "certificate-authority-data",
            ))?;
        let cert_data = user
            .user
            .client_certificate_data
            .clone()
            .ok_or(KubeconfigError::MissingUserField("client-certificate-data"))?;
        let key_data = user
            .user
            .client_key_data
            .clone()
            .ok_or(KubeconfigError::MissingUserField("client-key-data"))?;

        Ok(ClusterCredentials {
            server,
            ca_data,
            cert_data,
            key_data,
        })
    }
}
