//! GraphQL type references.
//!
//! Introspection describes nullability and list modifiers as wrapper nodes
//! (`LIST`, `NON_NULL`) around a named base type. [`TypeRef`] keeps that
//! chain as a recursive enum so a wrapper can never lack its inner type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SchemaError;

/// What kind of GraphQL type a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// Whether a field of this base kind takes a selection set.
    pub fn has_selection_set(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }
}

/// A GraphQL type reference: a named base type under any number of wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named { kind: TypeKind, name: String },
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

/// Wire shape of `__Type` references as they appear in introspection JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<RawTypeRef>>,
}

impl TryFrom<RawTypeRef> for TypeRef {
    type Error = SchemaError;

    fn try_from(raw: RawTypeRef) -> Result<Self, Self::Error> {
        match raw.kind {
            TypeKind::List | TypeKind::NonNull => {
                let inner = raw.of_type.ok_or_else(|| {
                    SchemaError::Malformed(format!("{:?} type reference without ofType", raw.kind))
                })?;
                let inner = Box::new(TypeRef::try_from(*inner)?);
                Ok(if raw.kind == TypeKind::List {
                    TypeRef::List(inner)
                } else {
                    TypeRef::NonNull(inner)
                })
            }
            kind => {
                let name = raw.name.ok_or_else(|| {
                    SchemaError::Malformed(format!("{:?} type reference without name", kind))
                })?;
                Ok(TypeRef::Named { kind, name })
            }
        }
    }
}

impl TypeRef {
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self::Named {
            kind,
            name: name.into(),
        }
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Unwrap every `LIST`/`NON_NULL` layer and return the named base.
    pub fn resolve_base(&self) -> &TypeRef {
        let mut current = self;
        while let TypeRef::List(inner) | TypeRef::NonNull(inner) = current {
            current = inner;
        }
        current
    }

    /// Name of the base type.
    pub fn base_name(&self) -> &str {
        match self.resolve_base() {
            TypeRef::Named { name, .. } => name,
            _ => unreachable!("resolve_base always returns a named type"),
        }
    }

    /// Kind of the base type.
    pub fn base_kind(&self) -> TypeKind {
        match self.resolve_base() {
            TypeRef::Named { kind, .. } => *kind,
            _ => unreachable!("resolve_base always returns a named type"),
        }
    }

    /// Kind of the outermost layer.
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeRef::Named { kind, .. } => *kind,
            TypeRef::List(_) => TypeKind::List,
            TypeRef::NonNull(_) => TypeKind::NonNull,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Render the wrapper chain in type-string grammar, e.g. `[Int!]!`.
    pub fn to_type_string(&self) -> String {
        match self {
            TypeRef::NonNull(inner) => format!("{}!", inner.to_type_string()),
            TypeRef::List(inner) => format!("[{}]", inner.to_type_string()),
            TypeRef::Named { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_type_string())
    }
}

impl Serialize for TypeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawTypeRef::from(self).serialize(serializer)
    }
}

impl From<&TypeRef> for RawTypeRef {
    fn from(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Named { kind, name } => RawTypeRef {
                kind: *kind,
                name: Some(name.clone()),
                of_type: None,
            },
            TypeRef::List(inner) | TypeRef::NonNull(inner) => RawTypeRef {
                kind: ty.kind(),
                name: None,
                of_type: Some(Box::new(RawTypeRef::from(inner.as_ref()))),
            },
        }
    }
}
