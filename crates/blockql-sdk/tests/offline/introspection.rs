use super::*;
use blockql_sdk::config::parse_headers;
use blockql_sdk::introspection::{IntrospectionClient, INTROSPECTION_QUERY};
use blockql_sdk::{FetchError, SchemaError, TypeKind};
use reqwest::header::HeaderMap;
use std::time::Duration;
use wiremock::matchers::header;

async fn serve(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn client(config: RegistryConfig) -> IntrospectionClient {
    IntrospectionClient::new(&config).unwrap()
}

// ── Request shape ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn posts_introspection_query_as_json() {
    let server = serve(ResponseTemplate::new(200).set_body_json(introspection_body(None))).await;
    client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["operationName"], "IntrospectionQuery");
    assert_eq!(body["query"], INTROSPECTION_QUERY);
}

#[tokio::test]
async fn sends_default_and_extra_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-team", "core"))
        .and(header("authorization", "Bearer extra"))
        .respond_with(ResponseTemplate::new(200).set_body_json(introspection_body(None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = RegistryConfig::default().with_headers(
        parse_headers(r#"{"x-team": "core", "authorization": "Bearer default"}"#).unwrap(),
    );
    let extra = parse_headers(r#"{"authorization": "Bearer extra"}"#).unwrap();
    client(config).fetch(&server.uri(), &extra).await.unwrap();
}

// ── Responses ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn builds_schema_from_response() {
    let server = serve(ResponseTemplate::new(200).set_body_json(introspection_body(None))).await;
    let schema = client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap();
    assert_eq!(schema.query_type.as_deref(), Some("Query"));
    assert_eq!(schema.get_type("Node").unwrap().kind, TypeKind::Interface);
    let root = schema.root().unwrap();
    assert!(root.has_field("query"));
    assert!(!root.has_field("mutation"));
}

#[tokio::test]
async fn graphql_errors_fail_the_fetch() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({
        "errors": [{ "message": "Introspection is disabled" }]
    })))
    .await;
    let err = client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Schema(SchemaError::GraphQL(_))));
    assert!(err.to_string().contains("Introspection is disabled"));
}

#[tokio::test]
async fn http_error_status_fails_the_fetch() {
    let server = serve(ResponseTemplate::new(503).set_body_string("maintenance")).await;
    let err = client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap_err();
    match err {
        FetchError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_schema_fails_the_fetch() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({ "data": {} }))).await;
    let err = client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Schema(SchemaError::MissingSchema)));
}

#[tokio::test]
async fn non_json_body_fails_the_fetch() {
    let server = serve(ResponseTemplate::new(200).set_body_string("<html>")).await;
    let err = client(RegistryConfig::default())
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Schema(SchemaError::Json(_))));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_json(introspection_body(None))
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    let err = client(RegistryConfig::default().with_timeout(Duration::from_millis(100)))
        .fetch(&server.uri(), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
