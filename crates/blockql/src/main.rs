mod commands;
mod output;

use blockql_sdk::config::{auto_headers, parse_headers};
use blockql_sdk::{EndpointRegistry, RegistryConfig};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

/// blockql: explore GraphQL endpoints and compile selection trees into queries
#[derive(Debug, Parser)]
#[command(name = "blockql", version, about)]
struct Cli {
    /// Extra introspection headers as a JSON object
    /// (overrides $BLOCKQL_HEADERS and ~/.blockql_headers.json).
    #[arg(long, global = true)]
    headers: Option<String>,

    /// Output format. Auto-detected if not specified (human for terminal, json for pipe).
    #[arg(long, global = true)]
    format: Option<output::Format>,

    /// Introspection request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List root entry points and fragment targets of an endpoint.
    Roots(commands::roots::RootsCmd),
    /// List the selectable fields and fragments of a type.
    Catalog(commands::catalog::CatalogCmd),
    /// Compile a selection tree (JSON) into query text.
    Serialize(commands::serialize::SerializeCmd),
    /// Check a selection tree against an endpoint's current schema.
    Validate(commands::validate::ValidateCmd),
    /// Print a compact command reference.
    Usage,
}

fn registry_config(cli: &Cli) -> anyhow::Result<RegistryConfig> {
    let headers = match &cli.headers {
        Some(json) => parse_headers(json)?,
        None => auto_headers()?,
    };
    Ok(RegistryConfig::default()
        .with_headers(headers)
        .with_timeout(Duration::from_secs(cli.timeout_secs)))
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let format = output::resolve_format(cli.format);

    // Handle commands that don't talk to an endpoint.
    match cli.command {
        Command::Usage => {
            commands::usage::run();
            return;
        }
        Command::Serialize(cmd) => {
            if let Err(e) = commands::serialize::run(cmd, format).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            return;
        }
        _ => {}
    }

    let registry = match registry_config(&cli)
        .and_then(|config| EndpointRegistry::new(config).map_err(anyhow::Error::from))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Roots(cmd) => commands::roots::run(cmd, &registry, format).await,
        Command::Catalog(cmd) => commands::catalog::run(cmd, &registry, format).await,
        Command::Validate(cmd) => commands::validate::run(cmd, &registry, format).await,
        Command::Usage | Command::Serialize(_) => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
