use anyhow::bail;
use blockql_sdk::compat::IssueKind;
use blockql_sdk::{EndpointRegistry, Parent, TreeIssue};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{load_schema, read_tree, CLI_INSTANCE};
use crate::output::{self, Format};

/// Check a selection tree against an endpoint's schema.
#[derive(Debug, Args)]
pub struct ValidateCmd {
    /// GraphQL endpoint URL.
    pub url: String,
    /// JSON file holding the selection tree (`-` for stdin).
    pub file: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct IssueRow {
    pub path: String,
    pub kind: &'static str,
    pub message: String,
}

impl From<&TreeIssue> for IssueRow {
    fn from(issue: &TreeIssue) -> Self {
        let (kind, message) = match &issue.kind {
            IssueKind::Stale(e) => ("stale", e.to_string()),
            IssueKind::Incompatible { parent } => {
                ("incompatible", format!("not a valid selection under \"{}\"", parent))
            }
        };
        IssueRow {
            path: issue.path.join(" > "),
            kind,
            message,
        }
    }
}

pub async fn run(
    cmd: ValidateCmd,
    registry: &EndpointRegistry,
    format: Format,
) -> anyhow::Result<()> {
    let tree = read_tree(&cmd.file).await?;
    if tree.endpoint_url != cmd.url {
        bail!(
            "Selection tree targets {}, not {}",
            tree.endpoint_url,
            cmd.url
        );
    }
    load_schema(registry, &cmd.url).await?;

    let mut rows = Vec::new();
    let parent = Parent::Query {
        instance_id: CLI_INSTANCE,
    };
    if !registry.is_compatible(&tree, &parent) {
        rows.push(IssueRow {
            path: tree.label(),
            kind: "incompatible",
            message: format!("not a root entry point of {}", cmd.url),
        });
    }
    rows.extend(registry.validate_tree(&tree).iter().map(IssueRow::from));

    if rows.is_empty() {
        match format {
            Format::Human => println!("OK"),
            Format::Json => output::print_json(&rows)?,
        }
        return Ok(());
    }

    output::print_table(&rows, &rows, format)?;
    bail!("{} issue(s) found", rows.len())
}
