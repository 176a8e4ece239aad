//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, DescribeCommand, ResolveCommand, ValidateCommand};
use clap::{Parser, Subcommand};

/// Describe, validate and resolve typed configuration items.
#[derive(Parser)]
#[command(name = "autumn")]
#[command(version, about = "Describe, validate and resolve typed configuration items", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// List the items a manifest declares
    Describe(DescribeCommand),

    /// Check a manifest and its item declarations
    Validate(ValidateCommand),

    /// Resolve every item and print the values
    Resolve(ResolveCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
