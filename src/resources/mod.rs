//! Resource generation module.
//!
//! Contains utilities for generating the Kubernetes resources declared for
//! an ArgoCluster.
//!
//! ## Resources Generated
//!
//! | Resource | Purpose |
//! |----------|---------|
//! | Cluster Secret | Argo CD cluster registration |

pub mod cluster_secret;

pub use cluster_secret::{
    ClusterSecret, cluster_secret_name, generate_cluster_secret, kubeconfig_secret_name,
};
