//! Error types for the blockql SDK.
//!
//! None of these are fatal to a host: fetch failures leave the schema cache
//! untouched and stale references only flag the affected selection node.

use serde::{Deserialize, Serialize};

/// A single GraphQL error from an introspection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

fn join_messages(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "empty errors list".to_string();
    }
    errors
        .iter()
        .map(|e| {
            let mut parts = vec![e.message.clone()];
            if let Some(path) = &e.path {
                let path_str: Vec<String> = path.iter().map(|p| p.to_string()).collect();
                parts.push(format!("at {}", path_str.join(".")));
            }
            if let Some(ext) = &e.extensions {
                parts.push(format!("({})", ext));
            }
            parts.join(" ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// The introspection payload could not be turned into a schema model.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The server answered with a GraphQL `errors` list.
    #[error("GraphQL errors: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLError>),
    /// The response carried no `data.__schema` object.
    #[error("No __schema in response")]
    MissingSchema,
    /// The payload did not match the introspection shape.
    #[error("Malformed introspection payload: {0}")]
    Malformed(String),
    /// The body was not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while fetching a schema from an endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx HTTP response.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    /// The endpoint answered but the schema could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A selection node refers to something the current schema no longer has.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaleReferenceError {
    #[error("The fragment base type \"{0}\" no longer exists")]
    MissingFragmentType(String),
    #[error("The parent base type \"{0}\" no longer exists")]
    MissingParentType(String),
    #[error("The field \"{field}\" no longer exists for the type \"{parent}\"")]
    MissingField { parent: String, field: String },
    #[error("Field existence mismatch on \"{name}\": node is {node_shape}, schema type \"{type_name}\" is {schema_shape}")]
    ShapeMismatch {
        name: String,
        type_name: String,
        node_shape: &'static str,
        schema_shape: &'static str,
    },
}

/// Configuration could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Extra headers were not a JSON object of strings.
    #[error("Invalid headers: {0}")]
    InvalidHeaders(String),
    /// Endpoint URL did not parse.
    #[error("Invalid endpoint URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// A configuration file existed but could not be read.
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
