//! Print the ArgoCluster CRD manifest to stdout.
//!
//! ```bash
//! cargo run --bin crdgen
//! ```

use kube::CustomResourceExt;

use argocd_attach_webhook::crd::ArgoCluster;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", serde_yaml::to_string(&ArgoCluster::crd())?);
    Ok(())
}
