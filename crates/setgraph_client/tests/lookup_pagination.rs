use std::sync::Arc;

use secrecy::SecretString;
use setgraph_client::http_client::ReqwestSetgraphClient;
use setgraph_client::lookup::build_lookup;
use setgraph_client::{AuthToken, SetgraphError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token() -> AuthToken {
    AuthToken {
        access_token: SecretString::new("acc".into()),
        refresh_token: SecretString::new("ref".into()),
        user_id: "u1".into(),
    }
}

fn page_body(items: serde_json::Value, next: Option<&str>) -> serde_json::Value {
    match next {
        Some(href) => serde_json::json!({"items": items, "_links": {"next": {"href": href}}}),
        None => serde_json::json!({"items": items, "_links": {}}),
    }
}

fn empty_user_catalog() -> Mock {
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u1/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(serde_json::json!([]), None)))
}

#[tokio::test]
async fn walks_numbered_pages_until_next_link_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m1", "name": "Squat"}]),
            Some("/api/v1/measurements?page=1"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m2", "name": "Bench Press"}]),
            None,
        )))
        .mount(&server)
        .await;
    empty_user_catalog().mount(&server).await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    let map = build_lookup(api, token()).await.expect("lookup");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("m1").map(String::as_str), Some("Squat"));
    assert_eq!(map.get("m2").map(String::as_str), Some("Bench Press"));
}

#[tokio::test]
async fn empty_page_stops_a_catalog() {
    let server = MockServer::start().await;
    // Page 0 claims a next page, but page 1 comes back empty.
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m1", "name": "Squat"}]),
            Some("/api/v1/measurements?page=1"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([]),
            Some("/api/v1/measurements?page=2"),
        )))
        .mount(&server)
        .await;
    empty_user_catalog().mount(&server).await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    let map = build_lookup(api, token()).await.expect("lookup");
    assert_eq!(map.len(), 1);
}

#[tokio::test]
async fn user_scoped_entries_overwrite_global_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m1", "name": "Squat"}]),
            None,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u1/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m1", "name": "Squat", "customName": "Low-Bar Squat"}]),
            None,
        )))
        .mount(&server)
        .await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    let map = build_lookup(api, token()).await.expect("lookup");
    assert_eq!(map.get("m1").map(String::as_str), Some("Low-Bar Squat"));
}

#[tokio::test]
async fn bad_status_mid_pagination_ends_the_catalog_silently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            serde_json::json!([{"id": "m1", "name": "Squat"}]),
            Some("/api/v1/measurements?page=1"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    empty_user_catalog().mount(&server).await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    let map = build_lookup(api, token()).await.expect("lookup proceeds");
    assert_eq!(map.len(), 1);
}

#[tokio::test]
async fn bad_status_on_the_first_page_fails_the_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    empty_user_catalog().mount(&server).await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    let err = build_lookup(api, token()).await.unwrap_err();
    match err {
        SetgraphError::Api { status, message } => {
            assert_eq!(status, Some(503));
            assert!(message.contains("maintenance"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/measurements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(serde_json::json!([]), None)))
        .mount(&server)
        .await;
    empty_user_catalog().mount(&server).await;

    let api = Arc::new(ReqwestSetgraphClient::new(&server.uri()));
    build_lookup(api, token()).await.expect("lookup");

    let received = server.received_requests().await.unwrap();
    assert!(!received.is_empty());
    let auth = received[0].headers.get("authorization").unwrap();
    assert_eq!(auth.to_str().unwrap(), "Bearer acc");
}
