//! Custom Resource Definitions (CRDs) for argocd-attach-webhook.
//!
//! - `ArgoCluster`: a workload cluster to register with Argo CD

mod argo_cluster;

pub use argo_cluster::*;
