pub mod catalog;
pub mod compat;
pub mod config;
pub mod error;
pub mod introspection;
pub mod registry;
pub mod schema;
pub mod selection;
pub mod serialize;
pub mod type_ref;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use catalog::{build_catalog, CatalogEntry};
pub use compat::{Parent, TreeIssue};
pub use config::RegistryConfig;
pub use error::{ConfigError, FetchError, SchemaError, StaleReferenceError};
pub use registry::{EndpointRegistry, SchemaEvent};
pub use schema::SchemaModel;
pub use selection::{SelectionNode, ValueExpr};
pub use serialize::serialize;
pub use type_ref::{TypeKind, TypeRef};
