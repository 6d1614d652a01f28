use clap::Args;
use serde_json::json;

use super::helpers::read_tree;
use crate::output::{self, Format};

/// Compile a selection tree into query text.
#[derive(Debug, Args)]
pub struct SerializeCmd {
    /// JSON file holding the selection tree (`-` for stdin).
    pub file: String,
}

pub async fn run(cmd: SerializeCmd, format: Format) -> anyhow::Result<()> {
    let tree = read_tree(&cmd.file).await?;
    let query = blockql_sdk::serialize(&tree);
    match format {
        Format::Human => println!("{}", query),
        Format::Json => output::print_json(&json!({ "query": query }))?,
    }
    Ok(())
}
