//! Connection checks between selection nodes.
//!
//! Schema-aware checks only apply once the endpoint's schema is cached.
//! Until then every same-endpoint connection is accepted, so a slow
//! introspection round-trip never blocks editing.

use tracing::warn;

use crate::error::StaleReferenceError;
use crate::registry::RegistryState;
use crate::schema::SchemaModel;
use crate::selection::SelectionNode;

/// Category tag of the value a selection node produces.
pub const SELECTION_TAG: &str = "gql";

/// Where a child selection is being attached.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    /// A generic container that declares which value categories it accepts.
    Container { accepts: &'a [&'a str] },
    /// The top-level query construct of a registered instance.
    Query { instance_id: &'a str },
    /// Another selection node.
    Selection(&'a SelectionNode),
}

/// Whether `child` may be attached to `parent`.
pub fn is_compatible(state: &RegistryState, child: &SelectionNode, parent: &Parent<'_>) -> bool {
    match parent {
        Parent::Container { accepts } => accepts.contains(&SELECTION_TAG),
        Parent::Query { instance_id } => {
            let Some(endpoint_url) = state.instance_endpoint(instance_id) else {
                return false;
            };
            if endpoint_url != child.endpoint_url {
                return false;
            }
            // A model without a root type is treated like no schema at all.
            match state.schema(endpoint_url).and_then(|schema| schema.root()) {
                Some(root) => root.has_field(&child.name),
                None => true,
            }
        }
        Parent::Selection(parent) => {
            if parent.endpoint_url != child.endpoint_url {
                return false;
            }
            match state.schema(&child.endpoint_url) {
                Some(schema) => fits_under(schema, child, parent),
                None => true,
            }
        }
    }
}

/// Schema check for a nested connection. Nodes that do not resolve are
/// accepted; staleness is reported separately.
fn fits_under(schema: &SchemaModel, child: &SelectionNode, parent: &SelectionNode) -> bool {
    let Ok(parent_res) = parent.resolve(schema) else {
        return true;
    };
    let Some(parent_type) = schema.get_type(parent_res.base_type) else {
        return true;
    };

    match &child.parent_type_name {
        None => parent_type.accepts_fragment(&child.name),
        Some(owner) => owner == parent_res.base_type && parent_type.has_field(&child.name),
    }
}

/// A problem found while validating a selection tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeIssue {
    /// Labels from the root down to the offending node.
    pub path: Vec<String>,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// The node no longer resolves against the schema.
    Stale(StaleReferenceError),
    /// The node resolves but may not sit under its parent.
    Incompatible { parent: String },
}

impl std::fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self.path.join(" > ");
        match &self.kind {
            IssueKind::Stale(e) => write!(f, "{}: {}", path, e),
            IssueKind::Incompatible { parent } => {
                write!(f, "{}: not a valid selection under \"{}\"", path, parent)
            }
        }
    }
}

/// Walk `root` and report stale or misplaced nodes. Nodes are never
/// modified; the caller decides how to flag them.
pub fn validate_tree(schema: &SchemaModel, root: &SelectionNode) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    let mut path = Vec::new();
    walk(schema, root, None, &mut path, &mut issues);
    for issue in &issues {
        warn!(endpoint = %root.endpoint_url, "{}", issue);
    }
    issues
}

fn walk(
    schema: &SchemaModel,
    node: &SelectionNode,
    parent: Option<&SelectionNode>,
    path: &mut Vec<String>,
    issues: &mut Vec<TreeIssue>,
) {
    path.push(node.label());

    match node.resolve(schema) {
        Err(e) => issues.push(TreeIssue {
            path: path.clone(),
            kind: IssueKind::Stale(e),
        }),
        Ok(_) => {
            if let Some(parent) = parent {
                if !fits_under(schema, node, parent) {
                    issues.push(TreeIssue {
                        path: path.clone(),
                        kind: IssueKind::Incompatible {
                            parent: parent.label(),
                        },
                    });
                }
            }
        }
    }

    for child in node.filled_children() {
        walk(schema, child, Some(node), path, issues);
    }
    path.pop();
}
