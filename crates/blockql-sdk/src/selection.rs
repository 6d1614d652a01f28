//! User-authored selection nodes.
//!
//! A [`SelectionNode`] is one field or fragment in a query under
//! construction. Object nodes own an ordered list of child slots; a slot may
//! be empty while the user has not filled it yet.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StaleReferenceError;
use crate::schema::{FieldRecord, SchemaModel};
use crate::type_ref::TypeKind;

/// A literal value supplied for an argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueExpr {
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<ValueExpr>),
    Object(IndexMap<String, ValueExpr>),
}

impl From<bool> for ValueExpr {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for ValueExpr {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for ValueExpr {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ValueExpr {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<ValueExpr>> From<Vec<T>> for ValueExpr {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// An argument slot on a selection node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionArgument {
    pub name: String,
    /// Declared type in type-string grammar, e.g. `[ID!]`.
    pub type_string: String,
    /// Kind of the declared base type, when known. Only `ENUM` changes how
    /// text values are written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_kind: Option<TypeKind>,
    #[serde(default)]
    pub value: Option<ValueExpr>,
}

/// One field or fragment in a selection tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionNode {
    pub endpoint_url: String,
    pub name: String,
    /// Type the field belongs to. `None` marks a fragment.
    #[serde(default)]
    pub parent_type_name: Option<String>,
    #[serde(default)]
    pub is_object: bool,
    #[serde(default)]
    pub arguments: Vec<SelectionArgument>,
    #[serde(default)]
    pub children: Vec<Option<SelectionNode>>,
}

impl SelectionNode {
    /// A leaf field of `parent_type`.
    pub fn field(
        endpoint_url: impl Into<String>,
        parent_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            name: name.into(),
            parent_type_name: Some(parent_type.into()),
            is_object: false,
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A field of `parent_type` that takes a selection set.
    pub fn object_field(
        endpoint_url: impl Into<String>,
        parent_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            is_object: true,
            ..Self::field(endpoint_url, parent_type, name)
        }
    }

    /// An inline fragment on `type_name`.
    pub fn fragment(endpoint_url: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            name: type_name.into(),
            parent_type_name: None,
            is_object: true,
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_argument(
        self,
        name: impl Into<String>,
        type_string: impl Into<String>,
        value: Option<ValueExpr>,
    ) -> Self {
        self.with_typed_argument(name, type_string, None, value)
    }

    /// Like [`with_argument`](Self::with_argument), recording the base type's kind.
    pub fn with_typed_argument(
        mut self,
        name: impl Into<String>,
        type_string: impl Into<String>,
        base_kind: Option<TypeKind>,
        value: Option<ValueExpr>,
    ) -> Self {
        self.arguments.push(SelectionArgument {
            name: name.into(),
            type_string: type_string.into(),
            base_kind,
            value,
        });
        self
    }

    pub fn with_child(mut self, child: SelectionNode) -> Self {
        self.children.push(Some(child));
        self
    }

    pub fn with_empty_slot(mut self) -> Self {
        self.children.push(None);
        self
    }

    pub fn is_fragment(&self) -> bool {
        self.parent_type_name.is_none()
    }

    /// Filled child slots in order.
    pub fn filled_children(&self) -> impl Iterator<Item = &SelectionNode> {
        self.children.iter().flatten()
    }

    /// Display label: the field name, or `... on Type` for fragments.
    pub fn label(&self) -> String {
        if self.is_fragment() {
            format!("... on {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Resolve this node against `schema`.
    ///
    /// Fails with [`StaleReferenceError`] when the fragment type, parent type
    /// or field has disappeared, or when the node's object/leaf shape no
    /// longer matches the schema type.
    pub fn resolve<'s>(
        &self,
        schema: &'s SchemaModel,
    ) -> Result<Resolution<'s>, StaleReferenceError> {
        let resolution = match &self.parent_type_name {
            None => {
                let ty = schema
                    .get_type(&self.name)
                    .ok_or_else(|| StaleReferenceError::MissingFragmentType(self.name.clone()))?;
                Resolution {
                    base_type: &ty.name,
                    base_kind: ty.kind,
                    field: None,
                }
            }
            Some(parent) => {
                let parent_type = schema
                    .get_type(parent)
                    .ok_or_else(|| StaleReferenceError::MissingParentType(parent.clone()))?;
                let field = parent_type.field(&self.name).ok_or_else(|| {
                    StaleReferenceError::MissingField {
                        parent: parent.clone(),
                        field: self.name.clone(),
                    }
                })?;
                Resolution {
                    base_type: field.ty.base_name(),
                    base_kind: field.ty.base_kind(),
                    field: Some(field),
                }
            }
        };

        if resolution.base_kind.has_selection_set() != self.is_object {
            return Err(StaleReferenceError::ShapeMismatch {
                name: self.name.clone(),
                type_name: resolution.base_type.to_string(),
                node_shape: shape(self.is_object),
                schema_shape: shape(resolution.base_kind.has_selection_set()),
            });
        }

        Ok(resolution)
    }
}

fn shape(is_object: bool) -> &'static str {
    if is_object {
        "an object"
    } else {
        "a leaf"
    }
}

/// What a selection node points at in a particular schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'s> {
    /// Name of the node's own base type (the fragment type for fragments).
    pub base_type: &'s str,
    pub base_kind: TypeKind,
    /// The field record, for non-fragments.
    pub field: Option<&'s FieldRecord>,
}

impl<'s> Resolution<'s> {
    /// Field description, usable as a tooltip.
    pub fn description(&self) -> Option<&'s str> {
        self.field.and_then(|f| f.description.as_deref())
    }
}
