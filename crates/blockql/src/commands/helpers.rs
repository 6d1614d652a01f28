use anyhow::{bail, Context};
use blockql_sdk::catalog::{ArgumentEntry, CatalogEntry};
use blockql_sdk::config::validate_endpoint;
use blockql_sdk::{EndpointRegistry, SchemaEvent, SchemaModel, SelectionNode};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;
use tracing::debug;

/// Instance id the CLI registers its endpoint under.
pub const CLI_INSTANCE: &str = "blockql-cli";

/// Register the CLI against `url` and wait for its schema.
pub async fn load_schema(
    registry: &EndpointRegistry,
    url: &str,
) -> anyhow::Result<Arc<SchemaModel>> {
    validate_endpoint(url)?;

    let mut events = registry.subscribe();
    if let Some(task) = registry.register_instance(CLI_INSTANCE, url) {
        task.await.context("schema fetch task failed")?;
    }
    if let Some(schema) = registry.schema(url) {
        debug!(endpoint = url, types = schema.types.len(), "schema loaded");
        return Ok(schema);
    }

    while let Ok(event) = events.try_recv() {
        if let SchemaEvent::RefreshFailed { message, .. } = event {
            bail!("{}", message);
        }
    }
    bail!("No schema available for {}", url)
}

/// Read a selection tree from a JSON file, or stdin when `path` is `-`.
pub async fn read_tree(path: &str) -> anyhow::Result<SelectionNode> {
    let text = if path == "-" {
        let mut buf = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut buf)
            .await
            .context("failed to read stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path))?
    };
    serde_json::from_str(&text).with_context(|| format!("{} is not a valid selection tree", path))
}

#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    pub kind: &'static str,
    pub name: String,
    pub parent: String,
    pub children: bool,
    pub arguments: String,
    pub description: String,
}

impl From<&CatalogEntry> for EntryRow {
    fn from(entry: &CatalogEntry) -> Self {
        match entry {
            CatalogEntry::Field(f) => EntryRow {
                kind: if f.is_deprecated { "field (deprecated)" } else { "field" },
                name: f.name.clone(),
                parent: f.parent_type_name.clone(),
                children: f.has_children,
                arguments: f
                    .arguments
                    .iter()
                    .map(format_argument)
                    .collect::<Vec<_>>()
                    .join(", "),
                description: f.description.clone().unwrap_or_default(),
            },
            CatalogEntry::Fragment(f) => EntryRow {
                kind: "fragment",
                name: format!("... on {}", f.name),
                parent: String::new(),
                children: true,
                arguments: String::new(),
                description: String::new(),
            },
        }
    }
}

/// `name: Type = default`, the way arguments appear in SDL.
pub fn format_argument(arg: &ArgumentEntry) -> String {
    match &arg.literal_default {
        Some(literal) => format!(
            "{}: {} = {}",
            arg.name,
            arg.type_string,
            serde_json::to_string(literal).unwrap_or_default()
        ),
        None => format!("{}: {}", arg.name, arg.type_string),
    }
}
