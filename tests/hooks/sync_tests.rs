//! Sync hook endpoint tests.

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::fixtures::{
    body_json, call, encoded_ca, encoded_cert, encoded_key, kubeconfig_secret, parent, post_json,
    sync_body, test_router,
};

#[tokio::test]
async fn sync_declares_registration_secret() {
    let body = sync_body(
        parent("demo", "team-a", true),
        json!({
            "demo-kubeconfig": kubeconfig_secret(
                "demo-kubeconfig",
                "team-a",
                "https://api.example:6443"
            )
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::OK);

    let response = body_json(&bytes);
    let attachments = response["attachments"].as_array().unwrap();
    assert_eq!(attachments.len(), 1);

    let secret = &attachments[0];
    assert_eq!(secret["apiVersion"], "v1");
    assert_eq!(secret["kind"], "Secret");
    assert_eq!(secret["type"], "Opaque");
    assert_eq!(secret["metadata"]["name"], "demo-argo-cluster");
    assert_eq!(secret["metadata"]["namespace"], "team-a");
    assert_eq!(
        secret["metadata"]["labels"]["argocd.argoproj.io/secret-type"],
        "cluster"
    );

    // The payload decodes back to the registration document
    let payload = STANDARD.decode(secret["data"].as_str().unwrap()).unwrap();
    let registration: serde_yaml::Value = serde_yaml::from_slice(&payload).unwrap();
    assert_eq!(registration["name"].as_str(), Some("demo"));
    assert_eq!(registration["clusterResources"].as_str(), Some("true"));
    assert_eq!(
        registration["server"].as_str(),
        Some("https://api.example:6443")
    );

    // ...with the certificate bundle embedded as JSON
    let config: serde_json::Value =
        serde_json::from_str(registration["config"].as_str().unwrap()).unwrap();
    assert_eq!(config["tlsClientConfig"]["caData"], encoded_ca());
    assert_eq!(config["tlsClientConfig"]["certData"], encoded_cert());
    assert_eq!(config["tlsClientConfig"]["keyData"], encoded_key());
}

#[tokio::test]
async fn sync_without_attach_label_declares_nothing() {
    let body = sync_body(
        parent("demo", "team-a", false),
        json!({
            "demo-kubeconfig": kubeconfig_secret(
                "demo-kubeconfig",
                "team-a",
                "https://api.example:6443"
            )
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_json(&bytes), json!({ "attachments": [] }));
}

#[tokio::test]
async fn sync_before_secret_observed_declares_nothing() {
    // No related field at all
    let body = json!({ "object": parent("demo", "team-a", true) });
    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_json(&bytes), json!({ "attachments": [] }));

    // Type key present but empty
    let body = sync_body(parent("demo", "team-a", true), json!({}));
    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_json(&bytes), json!({ "attachments": [] }));
}

#[tokio::test]
async fn sync_missing_named_secret_is_rejected() {
    let body = sync_body(
        parent("demo", "team-a", true),
        json!({
            "other-kubeconfig": kubeconfig_secret(
                "other-kubeconfig",
                "team-a",
                "https://api.example:6443"
            )
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = body_json(&bytes);
    let message = response["error"].as_str().unwrap();
    assert!(message.contains("demo-kubeconfig"));
}

#[tokio::test]
async fn sync_with_corrupt_base64_is_rejected() {
    let body = sync_body(
        parent("demo", "team-a", true),
        json!({
            "demo-kubeconfig": {
                "apiVersion": "v1",
                "kind": "Secret",
                "metadata": { "name": "demo-kubeconfig", "namespace": "team-a" },
                "data": "%%%not-base64%%%"
            }
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = body_json(&bytes);
    let message = response["error"].as_str().unwrap();
    assert!(message.contains("demo-kubeconfig"));
    assert!(message.contains("base64"));
}

#[tokio::test]
async fn sync_with_kubeconfig_missing_clusters_is_rejected() {
    let body = sync_body(
        parent("demo", "team-a", true),
        json!({
            "demo-kubeconfig": {
                "apiVersion": "v1",
                "kind": "Secret",
                "metadata": { "name": "demo-kubeconfig", "namespace": "team-a" },
                "data": STANDARD.encode("users: []\n")
            }
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = body_json(&bytes);
    let message = response["error"].as_str().unwrap();
    assert!(message.contains("no cluster entries"));
}

#[tokio::test]
async fn sync_without_parent_name_is_rejected() {
    let body = json!({
        "object": {
            "apiVersion": "gitops.example.com/v1alpha1",
            "kind": "ArgoCluster",
            "metadata": { "namespace": "team-a" },
            "spec": {}
        }
    });

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = body_json(&bytes);
    let message = response["error"].as_str().unwrap();
    assert!(message.contains("metadata.name"));
}

#[tokio::test]
async fn sync_output_ignores_spec_fields() {
    let mut parent = parent("demo", "team-a", true);
    parent["spec"] = json!({
        "clusterName": "something-else",
        "argoNamespace": "argocd",
        "project": "default"
    });
    let body = sync_body(
        parent,
        json!({
            "demo-kubeconfig": kubeconfig_secret(
                "demo-kubeconfig",
                "team-a",
                "https://api.example:6443"
            )
        }),
    );

    let (status, bytes) = call(test_router(), post_json("/sync", &body)).await;
    assert_eq!(status, StatusCode::OK);

    let response = body_json(&bytes);
    let secret = &response["attachments"][0];
    assert_eq!(secret["metadata"]["name"], "demo-argo-cluster");

    let payload = STANDARD.decode(secret["data"].as_str().unwrap()).unwrap();
    let registration: serde_yaml::Value = serde_yaml::from_slice(&payload).unwrap();
    assert_eq!(registration["name"].as_str(), Some("demo"));
}

#[tokio::test]
async fn sync_responses_are_byte_identical() {
    let body = sync_body(
        parent("demo", "team-a", true),
        json!({
            "demo-kubeconfig": kubeconfig_secret(
                "demo-kubeconfig",
                "team-a",
                "https://api.example:6443"
            )
        }),
    );

    let (first_status, first) = call(test_router(), post_json("/sync", &body)).await;
    let (second_status, second) = call(test_router(), post_json("/sync", &body)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
}
