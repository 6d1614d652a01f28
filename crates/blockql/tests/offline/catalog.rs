use super::*;

#[tokio::test(flavor = "multi_thread")]
async fn catalog_lists_fields_then_fragments() {
    let server = endpoint().await;
    let output = blockql()
        .args(["--format", "json", "catalog", server.uri().as_str(), "Node"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["id", "__typename", "User"]);
    assert_eq!(entries[0]["parentTypeName"], "Node");
    assert_eq!(entries[0]["hasChildren"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_carries_argument_metadata() {
    let server = endpoint().await;
    let output = blockql()
        .args(["--format", "json", "catalog", server.uri().as_str(), "Query"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let args = &entries[0]["arguments"];
    assert_eq!(args[0]["typeString"], "ID!");
    assert_eq!(args[0]["nullable"], false);
    assert_eq!(args[1]["typeString"], "Int");
    assert_eq!(args[1]["literalDefault"], 64);
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_human_shows_argument_signatures() {
    let server = endpoint().await;
    blockql()
        .args(["--format", "human", "catalog", server.uri().as_str(), "Query"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id: ID!, size: Int = 64"));
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_unknown_type_fails() {
    let server = endpoint().await;
    blockql()
        .args(["catalog", server.uri().as_str(), "Comment"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown type 'Comment'"));
}
