//! Resolve command implementation.
//!
//! This module implements the `resolve` command, which loads every item a
//! manifest declares from flags, the environment and configuration files,
//! then prints the resolved values.

use crate::error::CliError;
use crate::utils::{expand_home, load_registry, shorten_path, GlobalOptions};
use autumn::{Loader, LoaderOptions, Registry, ResolvedConfig};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

/// Resolve configuration items and print their values.
#[derive(Args)]
pub struct ResolveCommand {
    /// Item manifest declaring the configuration items
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Directory holding config.* and config-<profile>.*
    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        env = "AUTUMN_CONFIG_DIR"
    )]
    pub config_dir: PathBuf,

    /// Directory holding secrets.* (defaults to the config directory)
    #[arg(long, value_name = "DIR", env = "AUTUMN_SECRETS_DIR")]
    pub secrets_dir: Option<PathBuf>,

    /// Activate a profile; later profiles take precedence
    #[arg(
        long = "profile",
        value_name = "PROFILE",
        env = "AUTUMN_PROFILES",
        value_delimiter = ','
    )]
    pub profiles: Vec<String>,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "AUTUMN_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: ResolveFormat,

    /// Report bad values and failed validation as warnings instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Item flags, e.g. `-- --server.port 9090`
    #[arg(last = true, value_name = "ITEM_FLAGS", allow_hyphen_values = true)]
    pub item_flags: Vec<String>,
}

/// Output format for the resolve command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ResolveFormat {
    /// Tab-separated key, value and source (human-readable)
    Table,
    /// JSON object keyed by item key
    Json,
    /// YAML mapping keyed by item key
    Yaml,
    /// `ENV_NAME=value` lines
    Dotenv,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();
        let registry = load_registry(&self.manifest)?;
        let flags = registry.parse_flags(&self.item_flags)?;

        let mut options =
            LoaderOptions::new(expand_home(&self.config_dir)).with_profiles(self.profiles);
        if let Some(dir) = &self.secrets_dir {
            options = options.with_secrets_dir(expand_home(dir));
        }
        logger.info(&format!(
            "Reading configuration from {}",
            shorten_path(&options.config_dir)
        ));

        let config = Loader::new(options)
            .with_flags(flags)
            .load(&registry, &logger.handlers(self.lenient))?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            ResolveFormat::Table => format_as_table(&config, &mut handle),
            ResolveFormat::Json => format_as_json(&config, &mut handle),
            ResolveFormat::Yaml => format_as_yaml(&config, &mut handle),
            ResolveFormat::Dotenv => format_as_dotenv(&registry, &config, &mut handle),
        }
    }
}

/// Format resolved values as a human-readable table.
fn format_as_table(config: &ResolvedConfig, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "KEY\tVALUE\tSOURCE")?;
    for entry in config {
        writeln!(out, "{}\t{}\t{}", entry.key, entry.value, entry.source)?;
    }
    Ok(())
}

/// Format resolved values as a JSON object.
fn format_as_json(config: &ResolvedConfig, out: &mut impl Write) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, config)?;
    writeln!(out)?;
    Ok(())
}

/// Format resolved values as a YAML mapping.
fn format_as_yaml(config: &ResolvedConfig, out: &mut impl Write) -> Result<(), CliError> {
    let text = serde_yaml::to_string(config)?;
    write!(out, "{text}")?;
    Ok(())
}

/// Format resolved values as dotenv lines, named by each item's env name.
fn format_as_dotenv(
    registry: &Registry,
    config: &ResolvedConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for item in registry {
        if let Some(value) = config.get(item.key()) {
            writeln!(out, "{}={}", item.env_name(), dotenv_quote(&value.to_string()))?;
        }
    }
    Ok(())
}

/// Quote a dotenv value unless it is made only of safe characters.
fn dotenv_quote(value: &str) -> String {
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_-.,:/@+".contains(c));
    if safe && !value.is_empty() {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
