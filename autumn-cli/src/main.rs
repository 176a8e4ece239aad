//! Main entry point for the autumn CLI.
//!
//! It provides commands for working with configuration item manifests:
//! - `describe`: List the items a manifest declares
//! - `validate`: Check a manifest and its item declarations
//! - `resolve`: Load every item from flags, environment and files
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let logger = global.logger();

    let result = match cli.command {
        cli::Command::Describe(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            logger.error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}
