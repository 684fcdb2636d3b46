//! Attachment synthesis for the sync hook.
//!
//! Computes the full desired attachment set for a parent on every call. The
//! runtime owns diffing and apply; this function only declares state.

use tracing::{debug, info};

use crate::crd::ArgoCluster;
use crate::hooks::contract::RelatedObjects;
use crate::kubeconfig::Kubeconfig;
use crate::resources::{ClusterSecret, generate_cluster_secret, kubeconfig_secret_name};

use super::error::{Error, Result};

/// Validated parent identity: name and namespace must both be present
/// before any decision is made.
pub fn parent_identity(parent: &ArgoCluster) -> Result<(String, String)> {
    let name = parent
        .metadata
        .name
        .clone()
        .ok_or_else(|| Error::MissingField("metadata.name".to_string()))?;
    let namespace = parent
        .metadata
        .namespace
        .clone()
        .ok_or_else(|| Error::MissingField("metadata.namespace".to_string()))?;
    Ok((name, namespace))
}

/// Compute the desired attachments for a parent given the observed related
/// objects. Returns zero or one registration Secret.
///
/// The gates run in a fixed order: an empty Secret snapshot means the
/// kubeconfig has not been observed yet (declare nothing, succeed), an
/// absent `argocd-attach` label means the parent opted out (declare
/// nothing, succeed). Only after both gates does credential extraction run,
/// and any failure there fails the whole tick.
pub fn desired_attachments(
    parent: &ArgoCluster,
    related: &RelatedObjects,
) -> Result<Vec<ClusterSecret>> {
    let (name, namespace) = parent_identity(parent)?;

    let secrets = related.secrets();
    if secrets.is_empty() {
        info!(
            name = %name,
            namespace = %namespace,
            "Kubeconfig secret not observed yet; declaring no attachments"
        );
        return Ok(Vec::new());
    }

    if !parent.attach_requested() {
        info!(
            name = %name,
            namespace = %namespace,
            "Attach label absent; declaring no attachments"
        );
        return Ok(Vec::new());
    }

    let secret_name = kubeconfig_secret_name(&name);
    let secret = secrets
        .get(secret_name.as_str())
        .ok_or_else(|| Error::RelatedSecretMissing(secret_name.clone()))?;

    let kubeconfig =
        Kubeconfig::from_secret_value(secret).map_err(|source| Error::Credential {
            name: secret_name.clone(),
            source,
        })?;
    let credentials = kubeconfig
        .primary_credentials()
        .map_err(|source| Error::Credential {
            name: secret_name,
            source,
        })?;

    let attachment = generate_cluster_secret(&name, &namespace, &credentials)?;
    debug!(
        name = %name,
        namespace = %namespace,
        server = %credentials.server,
        "Generated cluster registration"
    );

    Ok(vec![attachment])
}
