use serde::Serialize;
use std::io::IsTerminal;
use tabled::{Table, Tabled};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// Determine the output format based on the user's choice and terminal detection.
pub fn resolve_format(format: Option<Format>) -> Format {
    match format {
        Some(f) => f,
        None => {
            if std::io::stdout().is_terminal() {
                Format::Human
            } else {
                Format::Json
            }
        }
    }
}

/// Print rows as a table (human) or print `json` (JSON).
///
/// JSON output carries the full records rather than the flattened rows.
pub fn print_table<T: Tabled, J: Serialize + ?Sized>(
    rows: &[T],
    json: &J,
    format: Format,
) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(json)?);
        }
        Format::Human => {
            if rows.is_empty() {
                println!("No results.");
                return Ok(());
            }
            println!("{}", Table::new(rows));
        }
    }
    Ok(())
}

/// Print a single item as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(item: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}
