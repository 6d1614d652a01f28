//! Catalog of selectable children for a type.
//!
//! The catalog is what a chooser presents under an object node: every field
//! of the type in declaration order, then one inline fragment per possible
//! type.

use serde::Serialize;

use crate::schema::{ArgumentRecord, FieldRecord, SchemaModel};
use crate::selection::{SelectionNode, ValueExpr};
use crate::type_ref::{TypeKind, TypeRef};

/// A primitive literal pre-built from an argument's schema default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<Literal> for ValueExpr {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Boolean(b) => ValueExpr::Boolean(b),
            Literal::Number(n) => ValueExpr::Number(n),
            Literal::Text(s) => ValueExpr::Text(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentEntry {
    pub name: String,
    pub type_string: String,
    pub base_kind: TypeKind,
    /// A nullable argument gets a `null` placeholder in the chooser.
    pub nullable: bool,
    pub literal_default: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    pub name: String,
    pub parent_type_name: String,
    pub has_children: bool,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub arguments: Vec<ArgumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentEntry {
    /// The fragment's type condition.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum CatalogEntry {
    Field(FieldEntry),
    Fragment(FragmentEntry),
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Fragment(f) => &f.name,
        }
    }

    /// `None` for fragments.
    pub fn parent_type_name(&self) -> Option<&str> {
        match self {
            Self::Field(f) => Some(&f.parent_type_name),
            Self::Fragment(_) => None,
        }
    }

    pub fn has_children(&self) -> bool {
        match self {
            Self::Field(f) => f.has_children,
            Self::Fragment(_) => true,
        }
    }

    /// Materialize this entry as a fresh selection node on `endpoint_url`.
    ///
    /// Arguments start at their converted schema default, or unset.
    pub fn to_node(&self, endpoint_url: &str) -> SelectionNode {
        match self {
            Self::Field(f) => {
                let mut node = if f.has_children {
                    SelectionNode::object_field(endpoint_url, &f.parent_type_name, &f.name)
                } else {
                    SelectionNode::field(endpoint_url, &f.parent_type_name, &f.name)
                };
                for arg in &f.arguments {
                    node = node.with_typed_argument(
                        &arg.name,
                        &arg.type_string,
                        Some(arg.base_kind),
                        arg.literal_default.clone().map(ValueExpr::from),
                    );
                }
                node
            }
            Self::Fragment(f) => SelectionNode::fragment(endpoint_url, &f.name),
        }
    }
}

/// Build the catalog of selectable children of `type_name`.
///
/// Unknown types yield an empty catalog.
pub fn build_catalog(schema: &SchemaModel, type_name: &str) -> Vec<CatalogEntry> {
    let Some(ty) = schema.get_type(type_name) else {
        return Vec::new();
    };

    let fields = ty
        .fields
        .values()
        .map(|field| CatalogEntry::Field(field_entry(type_name, field)));

    let fragments = ty.possible_types.iter().map(|possible| {
        CatalogEntry::Fragment(FragmentEntry {
            name: possible.base_name().to_string(),
        })
    });

    fields.chain(fragments).collect()
}

fn field_entry(type_name: &str, field: &FieldRecord) -> FieldEntry {
    FieldEntry {
        name: field.name.clone(),
        parent_type_name: type_name.to_string(),
        has_children: field.ty.base_kind().has_selection_set(),
        description: field.description.clone(),
        is_deprecated: field.is_deprecated,
        arguments: field.args.iter().map(argument_entry).collect(),
    }
}

fn argument_entry(arg: &ArgumentRecord) -> ArgumentEntry {
    ArgumentEntry {
        name: arg.name.clone(),
        type_string: arg.ty.to_type_string(),
        base_kind: arg.ty.base_kind(),
        nullable: !arg.ty.is_non_null(),
        literal_default: literal_default(&arg.ty, arg.default_value.as_deref()),
    }
}

/// Convert a schema default to a primitive literal.
///
/// Only `Boolean`, `Int`/`Float` and `String`/`ID` defaults are converted.
/// Lists, input objects and enums are left unset.
pub fn literal_default(ty: &TypeRef, default_value: Option<&str>) -> Option<Literal> {
    let raw = default_value?.trim();
    let ty = match ty {
        TypeRef::NonNull(inner) => inner.as_ref(),
        other => other,
    };
    let TypeRef::Named { name, .. } = ty else {
        return None;
    };

    match name.as_str() {
        "Boolean" => raw.parse::<bool>().ok().map(Literal::Boolean),
        "Int" | "Float" => serde_json::from_str::<serde_json::Number>(raw)
            .ok()
            .map(Literal::Number),
        "String" | "ID" => unquote(raw).map(Literal::Text),
        _ => None,
    }
}

fn unquote(raw: &str) -> Option<String> {
    if raw == "null" {
        return None;
    }
    serde_json::from_str::<String>(raw).ok().or_else(|| {
        Some(
            raw.strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(raw)
                .to_string(),
        )
    })
}
