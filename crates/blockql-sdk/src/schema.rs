//! Query-ready schema model built from an introspection response.
//!
//! Types and fields are indexed by name in declaration order. Every type gets
//! a synthetic `__typename` field, and a synthetic root type named
//! [`ROOT_TYPE`] collects the `query`/`mutation` entry points plus every
//! object and interface type as fragment targets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{GraphQLError, SchemaError};
use crate::type_ref::{RawTypeRef, TypeKind, TypeRef};

/// Name of the synthetic root type. Not a legal GraphQL name.
pub const ROOT_TYPE: &str = "[root]";

/// Name of the meta field injected into every type.
pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentRecord {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Default value as the GraphQL literal text reported by the server.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<ArgumentRecord>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecord {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldRecord>,
    pub possible_types: Vec<TypeRef>,
}

impl TypeRecord {
    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether `type_name` is this type or one of its possible types.
    pub fn accepts_fragment(&self, type_name: &str) -> bool {
        self.name == type_name
            || self
                .possible_types
                .iter()
                .any(|ty| ty.base_name() == type_name)
    }
}

/// An indexed schema for one endpoint. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub types: IndexMap<String, TypeRecord>,
}

// ── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    data: Option<RawData>,
    #[serde(default)]
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize)]
struct RawData {
    #[serde(rename = "__schema", default)]
    schema: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    query_type: Option<RawNamed>,
    #[serde(default)]
    mutation_type: Option<RawNamed>,
    types: Vec<RawType>,
}

#[derive(Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: TypeKind,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
    #[serde(default)]
    possible_types: Option<Vec<RawTypeRef>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    args: Vec<RawInputValue>,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    is_deprecated: bool,
    #[serde(default)]
    deprecation_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInputValue {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    default_value: Option<String>,
}

// ── Builder ─────────────────────────────────────────────────────────────────

impl SchemaModel {
    /// Build from a full introspection response (`{data: {__schema}}` or `{errors}`).
    pub fn build(response: &Value) -> Result<Self, SchemaError> {
        let response: RawResponse = serde_json::from_value(response.clone())
            .map_err(|e| SchemaError::Malformed(e.to_string()))?;

        if let Some(errors) = response.errors {
            return Err(SchemaError::GraphQL(errors));
        }

        let schema = response
            .data
            .and_then(|d| d.schema)
            .filter(|s| !s.is_null())
            .ok_or(SchemaError::MissingSchema)?;

        Self::from_schema_value(&schema)
    }

    /// Build from the JSON text of a full introspection response.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::build(&value)
    }

    /// Build from a bare `__schema` object.
    pub fn from_schema_value(schema: &Value) -> Result<Self, SchemaError> {
        let raw: RawSchema = serde_json::from_value(schema.clone())
            .map_err(|e| SchemaError::Malformed(e.to_string()))?;

        let mut types: IndexMap<String, TypeRecord> = IndexMap::with_capacity(raw.types.len() + 1);
        let mut fragment_targets = Vec::new();

        for raw_type in raw.types {
            if matches!(raw_type.kind, TypeKind::Object | TypeKind::Interface)
                && !raw_type.name.starts_with("__")
            {
                fragment_targets.push(TypeRef::named(raw_type.kind, raw_type.name.clone()));
            }
            let record = convert_type(raw_type)?;
            types.insert(record.name.clone(), record);
        }

        let query_type = raw.query_type.map(|t| t.name);
        let mutation_type = raw.mutation_type.map(|t| t.name);

        let mut root_fields = IndexMap::new();
        if let Some(name) = &query_type {
            root_fields.insert(
                "query".to_string(),
                root_field("query", "A GraphQL query.", name),
            );
        }
        if let Some(name) = &mutation_type {
            root_fields.insert(
                "mutation".to_string(),
                root_field("mutation", "A GraphQL mutation.", name),
            );
        }

        types.insert(
            ROOT_TYPE.to_string(),
            TypeRecord {
                name: ROOT_TYPE.to_string(),
                kind: TypeKind::Object,
                description: None,
                fields: root_fields,
                possible_types: fragment_targets,
            },
        );

        debug!(types = types.len(), "built schema model");

        Ok(Self {
            query_type,
            mutation_type,
            types,
        })
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeRecord> {
        self.types.get(name)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The synthetic root type. `None` only for models assembled by hand
    /// without one.
    pub fn root(&self) -> Option<&TypeRecord> {
        self.get_type(ROOT_TYPE)
    }

    /// Look up `field` on the type named `type_name`.
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldRecord> {
        self.get_type(type_name).and_then(|t| t.field(field))
    }
}

fn convert_type(raw: RawType) -> Result<TypeRecord, SchemaError> {
    let mut fields = IndexMap::new();
    for raw_field in raw.fields.unwrap_or_default() {
        let field = convert_field(raw_field)?;
        fields.insert(field.name.clone(), field);
    }
    fields.insert(TYPENAME_FIELD.to_string(), typename_field());

    let possible_types = raw
        .possible_types
        .unwrap_or_default()
        .into_iter()
        .map(TypeRef::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeRecord {
        name: raw.name,
        kind: raw.kind,
        description: raw.description,
        fields,
        possible_types,
    })
}

fn convert_field(raw: RawField) -> Result<FieldRecord, SchemaError> {
    let args = raw
        .args
        .into_iter()
        .map(|arg| {
            Ok(ArgumentRecord {
                name: arg.name,
                description: arg.description,
                ty: TypeRef::try_from(arg.ty)?,
                default_value: arg.default_value,
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    Ok(FieldRecord {
        name: raw.name,
        description: raw.description,
        args,
        ty: TypeRef::try_from(raw.ty)?,
        is_deprecated: raw.is_deprecated,
        deprecation_reason: raw.deprecation_reason,
    })
}

fn typename_field() -> FieldRecord {
    FieldRecord {
        name: TYPENAME_FIELD.to_string(),
        description: None,
        args: Vec::new(),
        ty: TypeRef::non_null(TypeRef::named(TypeKind::Scalar, "String")),
        is_deprecated: false,
        deprecation_reason: None,
    }
}

fn root_field(name: &str, description: &str, type_name: &str) -> FieldRecord {
    FieldRecord {
        name: name.to_string(),
        description: Some(description.to_string()),
        args: Vec::new(),
        ty: TypeRef::named(TypeKind::Object, type_name),
        is_deprecated: false,
        deprecation_reason: None,
    }
}
