//! Describe command implementation.
//!
//! This module implements the `describe` command, which lists the items a
//! manifest declares in various formats (table, JSON, CSV).

use crate::error::CliError;
use crate::utils::{load_registry, GlobalOptions};
use autumn::{ConfigItem, Registry};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

/// Column headers for CSV output.
const COLUMN_HEADERS: [&str; 6] = ["key", "type", "default", "env_name", "flag_name", "description"];

/// Describe the items declared in a manifest.
#[derive(Args)]
pub struct DescribeCommand {
    /// Item manifest to describe
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "AUTUMN_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: DescribeFormat,
}

/// Output format for the describe command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DescribeFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl DescribeCommand {
    /// Execute the describe command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let registry = load_registry(&self.manifest)?;
        global
            .logger()
            .debug(&format!("{} item(s) declared", registry.len()));

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            DescribeFormat::Table => format_as_table(&registry, &mut handle),
            DescribeFormat::Json => format_as_json(&registry, &mut handle),
            DescribeFormat::Csv => format_as_csv(&registry, &mut handle),
        }
    }
}

fn row(item: &ConfigItem) -> [String; 6] {
    [
        item.key().to_string(),
        item.kind().to_string(),
        item.default().to_string(),
        item.env_name(),
        item.flag_name().to_string(),
        item.description().to_string(),
    ]
}

/// Format items as a human-readable table.
fn format_as_table(registry: &Registry, out: &mut impl Write) -> Result<(), CliError> {
    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(out, "{header_line}")?;

    for item in registry {
        let mut cells = row(item);
        for cell in &mut cells {
            if cell.is_empty() {
                *cell = "-".to_string();
            }
        }
        writeln!(out, "{}", cells.join("\t"))?;
    }

    Ok(())
}

/// Format items as a JSON array.
fn format_as_json(registry: &Registry, out: &mut impl Write) -> Result<(), CliError> {
    let json_data: Vec<serde_json::Value> = registry
        .iter()
        .map(|item| {
            serde_json::json!({
                "key": item.key(),
                "type": item.kind(),
                "default": item.default(),
                "env_name": item.env_name(),
                "flag_name": item.flag_name(),
                "description": item.description(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &json_data)?;
    writeln!(out)?;

    Ok(())
}

/// Format items as CSV.
fn format_as_csv(registry: &Registry, out: &mut impl Write) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COLUMN_HEADERS)?;
    for item in registry {
        writer.write_record(row(item))?;
    }
    writer.flush()?;

    Ok(())
}
