use super::*;
use blockql_sdk::{CatalogEntry, FetchError, Parent, SchemaEvent, SelectionNode};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::header;

// ── Registration ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_fetches_and_caches_schema() {
    let (server, registry) = setup().await;
    let url = server.uri();
    assert!(registry.list_selectable_roots(&url).is_empty());

    register_and_wait(&registry, "editor-1", &url).await;

    let schema = registry.schema(&url).expect("schema cached");
    assert!(schema.has_type("User"));
    let names: Vec<String> = registry
        .list_selectable_roots(&url)
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, ["query", "Query", "Node", "User", "Post"]);
    assert_eq!(registry.instance_roots("editor-1").len(), 5);
}

#[tokio::test]
async fn second_instance_reuses_cached_schema() {
    let (server, registry) = setup().await;
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;

    assert!(registry.register_instance("editor-2", &url).is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(registry.endpoint_for("editor-2"), Some(url));
}

#[tokio::test]
async fn concurrent_registrations_share_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(introspection_body(None))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    let registry = EndpointRegistry::new(RegistryConfig::default()).unwrap();
    let url = server.uri();

    let first = registry.register_instance("editor-1", &url);
    let second = registry.register_instance("editor-2", &url);
    assert!(first.is_some());
    assert!(second.is_none());
    first.unwrap().await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn instance_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(introspection_body(None)))
        .expect(1)
        .mount(&server)
        .await;
    let registry = EndpointRegistry::new(RegistryConfig::default()).unwrap();
    let url = server.uri();

    registry
        .register_instance_with_headers("editor-1", &url, r#"{"authorization": "Bearer secret"}"#)
        .unwrap()
        .expect("expected a fetch task")
        .await
        .unwrap();
    assert!(registry.schema(&url).is_some());
}

#[tokio::test]
async fn updates_are_broadcast() {
    let (server, registry) = setup().await;
    let url = server.uri();
    let mut events = registry.subscribe();

    register_and_wait(&registry, "editor-1", &url).await;
    assert_eq!(
        events.recv().await.unwrap(),
        SchemaEvent::Updated {
            endpoint_url: url.clone()
        }
    );

    registry.unregister_instance("editor-1");
    assert_eq!(
        events.recv().await.unwrap(),
        SchemaEvent::Evicted { endpoint_url: url }
    );
}

// ── Eviction ────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unregistering_last_instance_evicts() {
    let (server, registry) = setup().await;
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;
    registry.register_instance("editor-2", &url);

    registry.unregister_instance("editor-1");
    assert!(registry.schema(&url).is_some());

    registry.unregister_instance("editor-2");
    assert!(registry.schema(&url).is_none());
    assert!(registry.list_selectable_roots(&url).is_empty());
}

#[tokio::test]
async fn fetch_finishing_after_unregister_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(introspection_body(None))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    let registry = EndpointRegistry::new(RegistryConfig::default()).unwrap();
    let url = server.uri();

    let task = registry.register_instance("editor-1", &url).unwrap();
    registry.unregister_instance("editor-1");
    task.await.unwrap();
    assert!(registry.schema(&url).is_none());
}

// ── Refresh ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_refresh_keeps_cached_schema() {
    let (server, registry) = setup().await;
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;
    let before = registry.schema(&url).unwrap();

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "rate limited" }]
        })))
        .mount(&server)
        .await;
    let mut events = registry.subscribe();

    assert!(registry.refresh(&url).await.is_err());
    let after = registry.schema(&url).unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    match events.recv().await.unwrap() {
        SchemaEvent::RefreshFailed { message, .. } => assert!(message.contains("rate limited")),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_keeps_cached_schema() {
    let (server, registry) = setup().await;
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = registry.refresh(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 500, .. }));
    assert!(registry.schema(&url).is_some());
}

#[tokio::test]
async fn successful_refresh_replaces_schema() {
    let (server, registry) = setup().await;
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;
    let schema = registry.schema(&url).unwrap();
    assert!(!schema.root().unwrap().has_field("mutation"));

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(introspection_body(Some("motd"))))
        .mount(&server)
        .await;

    registry.refresh(&url).await.unwrap();
    let catalog = registry.catalog(&url, "Query");
    assert!(catalog.iter().any(|e| e.name() == "motd"));
}

// ── Compatibility through the registry ──────────────────────────────────────────────

#[tokio::test]
async fn compatibility_turns_strict_once_schema_arrives() {
    let (server, registry) = setup().await;
    let url = server.uri();
    let parent = SelectionNode::object_field(&url, "Query", "node");
    let post = SelectionNode::fragment(&url, "Post");

    let task = registry.register_instance("editor-1", &url).unwrap();
    task.await.unwrap();

    assert!(registry.is_compatible(
        &SelectionNode::fragment(&url, "User"),
        &Parent::Selection(&parent)
    ));
    assert!(!registry.is_compatible(&post, &Parent::Selection(&parent)));

    registry.unregister_instance("editor-1");
    assert!(registry.is_compatible(&post, &Parent::Selection(&parent)));
}

#[tokio::test]
async fn validate_tree_flags_fields_removed_by_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(introspection_body(Some("motd"))))
        .mount(&server)
        .await;
    let registry = EndpointRegistry::new(RegistryConfig::default()).unwrap();
    let url = server.uri();
    register_and_wait(&registry, "editor-1", &url).await;

    let query = registry
        .list_selectable_roots(&url)
        .into_iter()
        .find(|e| matches!(e, CatalogEntry::Field(f) if f.name == "query"))
        .unwrap()
        .to_node(&url)
        .with_child(SelectionNode::field(&url, "Query", "motd"));
    assert!(registry.validate_tree(&query).is_empty());

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(introspection_body(None)))
        .mount(&server)
        .await;
    registry.refresh(&url).await.unwrap();

    let issues = registry.validate_tree(&query);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, ["query", "motd"]);
}
