//! Integration tests for the Freshdesk client using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodesync_connector::ConnectorError;
use nodesync_freshdesk::{ContactDirectory, FreshdeskClient};

fn client(base_url: &str) -> FreshdeskClient {
    FreshdeskClient::new(base_url, "test-key", 42, Duration::from_millis(0)).unwrap()
}

#[tokio::test]
async fn fetches_all_pages_until_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .and(basic_auth("test-key", "_"))
        .and(query_param("company_id", "42"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "a@x.com", "description": null},
            {"email": "b@x.com", "description": "{\"pubkey\":\"pk-b\"}"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "c@x.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let contacts = client(&server.uri()).fetch_all_contacts().await.unwrap();

    let emails: Vec<&str> = contacts.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
    assert_eq!(
        contacts[1].embedded_pubkey().unwrap().unwrap(),
        "pk-b".to_string()
    );
}

#[tokio::test]
async fn empty_directory_yields_no_contacts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let contacts = client(&server.uri()).fetch_all_contacts().await.unwrap();
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn http_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client(&server.uri()).fetch_all_contacts().await;
    match result {
        Err(ConnectorError::HttpStatus { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
async fn mid_listing_failure_discards_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "a@x.com"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/contacts"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server.uri()).fetch_all_contacts().await;
    assert!(result.is_err());
}
