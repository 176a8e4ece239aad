//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: global options,
//! path expansion and manifest loading.

use crate::error::CliError;
use autumn::{ItemManifest, Logger, Registry};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

impl GlobalOptions {
    /// The stderr logger for these options.
    pub fn logger(&self) -> Logger {
        autumn::init_logger(self.verbose, self.quiet)
    }
}

/// Expand a leading `~/` to the home directory.
///
/// Paths without the prefix, or a missing home directory, are returned
/// unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Shorten a path for display, showing paths under the home directory as `~/...`.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Load a manifest file.
pub fn load_manifest(path: &Path) -> Result<ItemManifest, CliError> {
    let path = expand_home(path);
    if !path.is_file() {
        return Err(CliError::InvalidArguments(format!(
            "Manifest not found: {}",
            path.display()
        )));
    }
    Ok(ItemManifest::load(&path)?)
}

/// Load a manifest and set up a registry from it.
pub fn load_registry(path: &Path) -> Result<Registry, CliError> {
    let items = load_manifest(path)?.into_items()?;
    Ok(Registry::setup(items)?)
}
