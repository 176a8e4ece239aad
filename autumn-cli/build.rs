//! Build script for autumn-cli.
//!
//! Generates the `autumn.1` man page into OUT_DIR using clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared here rather than imported from src/cli.rs.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .value_name("MANIFEST")
        .help("Item manifest declaring the configuration items")
        .required(true)
}

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("autumn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Describe, validate and resolve typed configuration items")
        .long_about(
            "Reads a YAML manifest of typed configuration items and resolves each item \
             from command-line flags, CONFIG_* environment variables, secrets, profile \
             and base configuration files, falling back to its default",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("describe")
                .about("List the items a manifest declares")
                .arg(manifest_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["table", "json", "csv"])
                        .env("AUTUMN_OUTPUT_FORMAT"),
                ),
            Command::new("validate")
                .about("Check a manifest and its item declarations")
                .arg(manifest_arg()),
            Command::new("resolve")
                .about("Resolve every item and print the values")
                .arg(manifest_arg())
                .arg(
                    Arg::new("config-dir")
                        .long("config-dir")
                        .value_name("DIR")
                        .env("AUTUMN_CONFIG_DIR"),
                )
                .arg(
                    Arg::new("secrets-dir")
                        .long("secrets-dir")
                        .value_name("DIR")
                        .env("AUTUMN_SECRETS_DIR"),
                )
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .value_name("PROFILE")
                        .action(ArgAction::Append)
                        .env("AUTUMN_PROFILES"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["table", "json", "yaml", "dotenv"])
                        .env("AUTUMN_OUTPUT_FORMAT"),
                )
                .arg(
                    Arg::new("lenient")
                        .long("lenient")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("item-flags")
                        .value_name("ITEM_FLAGS")
                        .num_args(0..)
                        .last(true),
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true)),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").unwrap_or_default());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("autumn.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
