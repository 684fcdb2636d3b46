//! Related-resource selection for the customize hook.

use tracing::debug;

use crate::hooks::contract::ResourceRule;
use crate::resources::kubeconfig_secret_name;

/// Declare the related resources the runtime should resolve and watch for a
/// parent: exactly one query, for the kubeconfig Secret named after the
/// parent in its own namespace.
pub fn related_resource_rules(name: &str, namespace: &str) -> Vec<ResourceRule> {
    let secret_name = kubeconfig_secret_name(name);
    debug!(
        name = %name,
        namespace = %namespace,
        secret = %secret_name,
        "Declaring related resources"
    );

    vec![ResourceRule {
        api_version: "v1".to_string(),
        resource: "secrets".to_string(),
        namespace: namespace.to_string(),
        names: vec![secret_name],
    }]
}
