//! Integration tests for the ZeroTier client using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodesync_connector::{ConnectorError, RetryPolicy};
use nodesync_zerotier::{MemberUpdate, MeshNetwork, ZeroTierClient};

fn client(base_url: &str) -> ZeroTierClient {
    ZeroTierClient::new(base_url, "zt-token", "93afae5963c547f1", RetryPolicy::disabled()).unwrap()
}

fn retrying_client(base_url: &str, max_retries: u32) -> ZeroTierClient {
    ZeroTierClient::new(
        base_url,
        "zt-token",
        "93afae5963c547f1",
        RetryPolicy::new(max_retries)
            .with_initial_backoff(1)
            .with_max_backoff(5),
    )
    .unwrap()
}

#[tokio::test]
async fn lists_members_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/network/93afae5963c547f1/member"))
        .and(header("authorization", "Bearer zt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"nodeId": "A", "config": {"ipAssignments": ["10.0.0.1"]}},
            {"nodeId": "B", "config": {"ipAssignments": []}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server.uri()).list_members().await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].node_id, "A");
    assert_eq!(members[0].first_ip(), Some("10.0.0.1"));
    assert_eq!(members[1].first_ip(), None);
}

#[tokio::test]
async fn update_member_posts_metadata_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/network/93afae5963c547f1/member/A"))
        .and(header("authorization", "Bearer zt-token"))
        .and(body_json(json!({
            "name": "pk1",
            "description": "user@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodeId": "A"})))
        .expect(1)
        .mount(&server)
        .await;

    let update = MemberUpdate {
        name: "pk1".into(),
        description: "user@example.com".into(),
    };

    client(&server.uri()).update_member("A", &update).await.unwrap();
}

#[tokio::test]
async fn update_member_surfaces_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/network/93afae5963c547f1/member/A"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let update = MemberUpdate {
        name: "pk1".into(),
        description: "user@example.com".into(),
    };

    let result = client(&server.uri()).update_member("A", &update).await;
    match result {
        Err(ConnectorError::HttpStatus { status, .. }) => assert_eq!(status, 403),
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_retries_transient_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/network/93afae5963c547f1/member"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/network/93afae5963c547f1/member"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"nodeId": "A", "config": {"ipAssignments": ["10.0.0.1"]}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let members = retrying_client(&server.uri(), 5).list_members().await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn update_retries_are_idempotent_on_the_wire() {
    let server = MockServer::start().await;

    // Two identical POSTs: one failed attempt, one retry. The body is the
    // same both times, which is what makes the retry safe.
    Mock::given(method("POST"))
        .and(path("/api/network/93afae5963c547f1/member/A"))
        .and(body_json(json!({"name": "pk1", "description": "u@h.io"})))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/network/93afae5963c547f1/member/A"))
        .and(body_json(json!({"name": "pk1", "description": "u@h.io"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let update = MemberUpdate {
        name: "pk1".into(),
        description: "u@h.io".into(),
    };

    retrying_client(&server.uri(), 3)
        .update_member("A", &update)
        .await
        .unwrap();
}
