use blockql_sdk::EndpointRegistry;
use clap::Args;

use super::helpers::{load_schema, EntryRow, CLI_INSTANCE};
use crate::output::{self, Format};

/// List root entry points and fragment targets.
#[derive(Debug, Args)]
pub struct RootsCmd {
    /// GraphQL endpoint URL.
    pub url: String,
}

pub async fn run(cmd: RootsCmd, registry: &EndpointRegistry, format: Format) -> anyhow::Result<()> {
    load_schema(registry, &cmd.url).await?;
    let entries = registry.instance_roots(CLI_INSTANCE);
    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    output::print_table(&rows, &entries, format)
}
