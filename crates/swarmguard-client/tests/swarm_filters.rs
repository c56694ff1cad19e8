//! Integration tests for the swarm RPC client and the filter reconciler,
//! against a mocked node API.

use serde_json::json;
use std::collections::BTreeSet;
use swarmguard_client::{reconcile, NodeClient};
use swarmguard_core::Cidr;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NodeClient {
    NodeClient::builder().base_url(server.uri()).build()
}

fn cidr_set(entries: &[&str]) -> BTreeSet<Cidr> {
    entries.iter().map(|s| s.parse().unwrap()).collect()
}

async fn mount_filter_list(server: &MockServer, filters: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": filters })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_filters_handles_null_strings() {
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(null)).await;

    let filters = client_for(&server).swarm().filters().await.unwrap();
    assert!(filters.is_empty());
}

#[tokio::test]
async fn test_add_filter_sends_encoded_arg() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .and(query_param("arg", "/ip4/10.0.0.0/ipcidr/8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Strings": ["/ip4/10.0.0.0/ipcidr/8"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .swarm()
        .add_filter("/ip4/10.0.0.0/ipcidr/8")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_peer_count_counts_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/peers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Peers": [
                { "Addr": "/ip4/198.51.100.1/tcp/4001", "Peer": "12D3KooWA" },
                { "Addr": "/ip4/198.51.100.2/tcp/4001", "Peer": "12D3KooWB" },
                { "Addr": "/ip4/198.51.100.3/tcp/4001", "Peer": "12D3KooWC" },
            ]
        })))
        .mount(&server)
        .await;

    let count = client_for(&server).swarm().peer_count().await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_null_peer_list_counts_as_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/peers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Peers": null })))
        .mount(&server)
        .await;

    let count = client_for(&server).swarm().peer_count().await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_rejected_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/rm"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "Message": "filter not found",
            "Code": 0,
            "Type": "error"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .swarm()
        .rm_filter("/ip4/10.0.0.0/ipcidr/8")
        .await
        .unwrap_err();
    assert!(err.is_rejected());
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn test_unreachable_node_is_unavailable() {
    // Nothing listens on port 1.
    let client = NodeClient::builder().base_url("http://127.0.0.1:1").build();
    let err = client.swarm().filters().await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_reconcile_applies_minimal_diff() {
    let server = MockServer::start().await;
    mount_filter_list(
        &server,
        json!(["/ip4/10.0.0.0/ipcidr/8", "/ip4/192.0.2.0/ipcidr/24"]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .and(query_param("arg", "/ip4/172.16.0.0/ipcidr/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/rm"))
        .and(query_param("arg", "/ip4/192.0.2.0/ipcidr/24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(1)
        .mount(&server)
        .await;

    let desired = cidr_set(&["10.0.0.0/8", "172.16.0.0/12"]);
    let result = reconcile(&client_for(&server), &desired).await.unwrap();

    assert_eq!(result.added, 1);
    assert_eq!(result.removed, 1);
    assert!(!result.already_converged);
}

#[tokio::test]
async fn test_reconcile_converged_issues_no_operations() {
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(["/ip4/10.0.0.0/ipcidr/8"])).await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/rm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(0)
        .mount(&server)
        .await;

    let desired = cidr_set(&["10.0.0.0/8"]);
    let result = reconcile(&client_for(&server), &desired).await.unwrap();

    assert!(result.already_converged);
    assert_eq!(result.added, 0);
    assert_eq!(result.removed, 0);
}

#[tokio::test]
async fn test_reconcile_leaves_foreign_filters_alone() {
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(["/ip6/fc00::/ipcidr/7"])).await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/rm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(0)
        .mount(&server)
        .await;

    let result = reconcile(&client_for(&server), &BTreeSet::new()).await.unwrap();
    assert!(result.already_converged);
}

#[tokio::test]
async fn test_reconcile_treats_rejected_add_as_noop() {
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(null)).await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "Message": "filter already present",
            "Code": 0,
            "Type": "error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let desired = cidr_set(&["10.0.0.0/8"]);
    let result = reconcile(&client_for(&server), &desired).await.unwrap();

    assert!(!result.already_converged);
    assert_eq!(result.added, 0);
    assert_eq!(result.removed, 0);
}

#[tokio::test]
async fn test_reconcile_resumes_after_partial_failure() {
    let desired = cidr_set(&["10.0.0.0/8", "172.16.0.0/12"]);

    // First pass: the first add lands, the second dies on a gateway error.
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(null)).await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .and(query_param("arg", "/ip4/10.0.0.0/ipcidr/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .and(query_param("arg", "/ip4/172.16.0.0/ipcidr/12"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    assert!(reconcile(&client_for(&server), &desired).await.is_err());
    drop(server);

    // Second pass: the node now reports the filter that did land; only the
    // missing one is re-issued.
    let server = MockServer::start().await;
    mount_filter_list(&server, json!(["/ip4/10.0.0.0/ipcidr/8"])).await;
    Mock::given(method("POST"))
        .and(path("/api/v0/swarm/filters/add"))
        .and(query_param("arg", "/ip4/172.16.0.0/ipcidr/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Strings": null })))
        .expect(1)
        .mount(&server)
        .await;

    let result = reconcile(&client_for(&server), &desired).await.unwrap();
    assert_eq!(result.added, 1);
    assert!(!result.already_converged);
    drop(server);

    // Third pass: fully converged, nothing to do.
    let server = MockServer::start().await;
    mount_filter_list(
        &server,
        json!(["/ip4/10.0.0.0/ipcidr/8", "/ip4/172.16.0.0/ipcidr/12"]),
    )
    .await;

    let result = reconcile(&client_for(&server), &desired).await.unwrap();
    assert!(result.already_converged);
}
