use anyhow::bail;
use blockql_sdk::EndpointRegistry;
use clap::Args;

use super::helpers::{load_schema, EntryRow};
use crate::output::{self, Format};

/// List the selectable children of a type.
#[derive(Debug, Args)]
pub struct CatalogCmd {
    /// GraphQL endpoint URL.
    pub url: String,
    /// Type name, e.g. `User`.
    #[arg(value_name = "TYPE")]
    pub type_name: String,
}

pub async fn run(
    cmd: CatalogCmd,
    registry: &EndpointRegistry,
    format: Format,
) -> anyhow::Result<()> {
    let schema = load_schema(registry, &cmd.url).await?;
    if !schema.has_type(&cmd.type_name) {
        bail!("Unknown type '{}' on {}", cmd.type_name, cmd.url);
    }

    let entries = registry.catalog(&cmd.url, &cmd.type_name);
    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    output::print_table(&rows, &entries, format)
}
