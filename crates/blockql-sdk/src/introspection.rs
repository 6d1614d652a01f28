//! Fetch a schema from a GraphQL endpoint via introspection.

use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{ConfigError, FetchError};
use crate::schema::SchemaModel;

pub const OPERATION_NAME: &str = "IntrospectionQuery";

pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    types {
      ...FullType
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// HTTP client that runs the introspection query.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    http: reqwest::Client,
    default_headers: HeaderMap,
}

impl IntrospectionClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            default_headers: config.default_headers.clone(),
        })
    }

    /// POST the introspection query to `endpoint_url` and build the schema.
    ///
    /// `extra_headers` override the configured defaults.
    pub async fn fetch(
        &self,
        endpoint_url: &str,
        extra_headers: &HeaderMap,
    ) -> Result<SchemaModel, FetchError> {
        let body = serde_json::json!({
            "query": INTROSPECTION_QUERY,
            "operationName": OPERATION_NAME,
        });

        let mut headers = self.default_headers.clone();
        headers.extend(extra_headers.clone());

        info!(endpoint = endpoint_url, "fetching schema");
        let response = self
            .http
            .post(endpoint_url)
            .header(CONTENT_TYPE, "application/json")
            .header(
                USER_AGENT,
                format!("blockql-sdk/{}", env!("CARGO_PKG_VERSION")),
            )
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let schema = SchemaModel::from_json_str(&text)?;
        debug!(
            endpoint = endpoint_url,
            types = schema.types.len(),
            "introspection succeeded"
        );
        Ok(schema)
    }
}
