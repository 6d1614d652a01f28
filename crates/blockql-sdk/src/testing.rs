//! Shared introspection fixture for unit tests.

use serde_json::{json, Value};

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

fn arg(name: &str, ty: Value, default: Option<&str>) -> Value {
    json!({ "name": name, "description": null, "type": ty, "defaultValue": default })
}

fn field(name: &str, ty: Value, args: Vec<Value>) -> Value {
    json!({
        "name": name,
        "description": format!("The {name} field."),
        "args": args,
        "type": ty,
        "isDeprecated": false,
        "deprecationReason": null
    })
}

fn object(kind: &str, name: &str, fields: Vec<Value>, possible: Option<Vec<Value>>) -> Value {
    json!({
        "kind": kind,
        "name": name,
        "description": null,
        "fields": fields,
        "inputFields": null,
        "interfaces": [],
        "enumValues": null,
        "possibleTypes": possible
    })
}

fn leaf(kind: &str, name: &str) -> Value {
    json!({
        "kind": kind,
        "name": name,
        "description": null,
        "fields": null,
        "inputFields": null,
        "interfaces": null,
        "enumValues": null,
        "possibleTypes": null
    })
}

/// A small schema: `User implements Node`, `Post`, `SearchResult = User | Post`.
pub(crate) fn sample_response() -> Value {
    let id = || non_null(named("SCALAR", "ID"));
    json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": { "name": "Mutation" },
                "types": [
                    object("OBJECT", "Query", vec![
                        field("user", named("OBJECT", "User"), vec![arg("id", id(), None)]),
                        field("node", named("INTERFACE", "Node"), vec![arg("id", id(), None)]),
                        field("users", non_null(list(non_null(named("OBJECT", "User")))), vec![
                            arg("first", named("SCALAR", "Int"), Some("10")),
                            arg("active", named("SCALAR", "Boolean"), Some("true")),
                            arg("name", named("SCALAR", "String"), Some("\"bob\"")),
                            arg("tags", list(named("SCALAR", "String")), Some("[\"a\"]")),
                            arg("role", named("ENUM", "Role"), Some("ADMIN")),
                            arg("filter", named("INPUT_OBJECT", "UserFilter"), None),
                        ]),
                        field("search", list(named("UNION", "SearchResult")), vec![
                            arg("term", non_null(named("SCALAR", "String")), None),
                        ]),
                        field("version", named("SCALAR", "String"), vec![]),
                    ], None),
                    object("OBJECT", "Mutation", vec![
                        field("renameUser", named("OBJECT", "User"), vec![
                            arg("id", id(), None),
                            arg("name", non_null(named("SCALAR", "String")), None),
                        ]),
                    ], None),
                    object("INTERFACE", "Node", vec![field("id", id(), vec![])],
                        Some(vec![named("OBJECT", "User")])),
                    object("OBJECT", "User", vec![
                        field("id", id(), vec![]),
                        field("name", named("SCALAR", "String"), vec![]),
                        field("friends", list(named("OBJECT", "User")), vec![
                            arg("first", named("SCALAR", "Int"), None),
                        ]),
                    ], None),
                    object("OBJECT", "Post", vec![
                        field("id", id(), vec![]),
                        field("title", named("SCALAR", "String"), vec![]),
                    ], None),
                    object("UNION", "SearchResult", vec![],
                        Some(vec![named("OBJECT", "User"), named("OBJECT", "Post")])),
                    leaf("ENUM", "Role"),
                    leaf("INPUT_OBJECT", "UserFilter"),
                    leaf("SCALAR", "ID"),
                    leaf("SCALAR", "String"),
                    leaf("SCALAR", "Int"),
                    leaf("SCALAR", "Boolean"),
                    object("OBJECT", "__Schema", vec![
                        field("description", named("SCALAR", "String"), vec![]),
                    ], None),
                ]
            }
        }
    })
}

pub(crate) fn sample_schema() -> crate::SchemaModel {
    crate::SchemaModel::build(&sample_response()).expect("fixture schema builds")
}
