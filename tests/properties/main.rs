// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for attachment synthesis.
//!
//! Uses proptest to generate random parents and snapshots and verify the
//! gate ordering and determinism invariants.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use proptest::prelude::*;

use argocd_attach_webhook::controller::desired_attachments;
use argocd_attach_webhook::crd::{ATTACH_LABEL, ArgoCluster, ArgoClusterSpec};
use argocd_attach_webhook::hooks::contract::RelatedObjects;

/// Strategy for DNS-ish object names.
fn dns_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{1,12}"
}

/// Strategy for arbitrary label sets (the attach label is managed by the
/// test itself).
fn label_pairs() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,12}", "[a-z0-9]{0,8}", 0..4)
}

fn parent_with(
    name: &str,
    namespace: &str,
    mut labels: BTreeMap<String, String>,
    attach: bool,
) -> ArgoCluster {
    if attach {
        labels.insert(ATTACH_LABEL.to_string(), "true".to_string());
    } else {
        labels.remove(ATTACH_LABEL);
    }
    ArgoCluster {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: ArgoClusterSpec::default(),
        status: None,
    }
}

fn kubeconfig_secret_value(server: &str) -> serde_json::Value {
    let yaml = format!(
        "clusters:
- name: workload
  cluster:
    server: {server}
    certificate-authority-data: {ca}
users:
- name: admin
  user:
    client-certificate-data: {cert}
    client-key-data: {key}
",
        ca = STANDARD.encode("prop-ca"),
        cert = STANDARD.encode("prop-cert"),
        key = STANDARD.encode("prop-key"),
    );
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "data": STANDARD.encode(yaml),
    })
}

fn snapshot_for(secret_name: &str, secret: serde_json::Value) -> RelatedObjects {
    let mut by_name = BTreeMap::new();
    by_name.insert(secret_name.to_string(), secret);
    let mut by_type = BTreeMap::new();
    by_type.insert(RelatedObjects::SECRET_V1.to_string(), by_name);
    RelatedObjects(by_type)
}

proptest! {
    #[test]
    fn sync_is_deterministic(
        name in dns_name(),
        namespace in dns_name(),
        labels in label_pairs(),
        host in "[a-z]{3,8}",
    ) {
        let server = format!("https://{host}.example:6443");
        let parent = parent_with(&name, &namespace, labels, true);
        let related = snapshot_for(
            &format!("{name}-kubeconfig"),
            kubeconfig_secret_value(&server),
        );

        let first = desired_attachments(&parent, &related).unwrap();
        let second = desired_attachments(&parent, &related).unwrap();
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn absent_label_never_attaches(
        name in dns_name(),
        namespace in dns_name(),
        labels in label_pairs(),
    ) {
        let parent = parent_with(&name, &namespace, labels, false);
        let related = snapshot_for(
            &format!("{name}-kubeconfig"),
            kubeconfig_secret_value("https://api.example:6443"),
        );

        let attachments = desired_attachments(&parent, &related).unwrap();
        prop_assert!(attachments.is_empty());
    }

    #[test]
    fn empty_snapshot_never_attaches(
        name in dns_name(),
        namespace in dns_name(),
        labels in label_pairs(),
    ) {
        let parent = parent_with(&name, &namespace, labels, true);

        let attachments = desired_attachments(&parent, &RelatedObjects::default()).unwrap();
        prop_assert!(attachments.is_empty());
    }

    #[test]
    fn attachment_is_named_after_parent(
        name in dns_name(),
        namespace in dns_name(),
        labels in label_pairs(),
    ) {
        let parent = parent_with(&name, &namespace, labels, true);
        let related = snapshot_for(
            &format!("{name}-kubeconfig"),
            kubeconfig_secret_value("https://api.example:6443"),
        );

        let attachments = desired_attachments(&parent, &related).unwrap();
        prop_assert_eq!(attachments.len(), 1);
        let expected_name = format!("{name}-argo-cluster");
        prop_assert_eq!(
            attachments[0].metadata.name.as_deref(),
            Some(expected_name.as_str())
        );
        prop_assert_eq!(
            attachments[0].metadata.namespace.as_deref(),
            Some(namespace.as_str())
        );
    }
}
