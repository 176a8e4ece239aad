//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing:
//! - An isolated temporary directory for manifests and configuration files
//! - A command builder with a clean `AUTUMN_*`/`CONFIG_*` environment
//! - A sample manifest

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables read by the binary itself.
const TOOL_VARS: [&str; 5] = [
    "AUTUMN_LOG_MODE",
    "AUTUMN_OUTPUT_FORMAT",
    "AUTUMN_CONFIG_DIR",
    "AUTUMN_SECRETS_DIR",
    "AUTUMN_PROFILES",
];

/// A manifest exercising every item option.
pub const SAMPLE_MANIFEST: &str = "\
- key: server.host
  type: string
  default: localhost
  description: The interface to listen on
- key: server.port
  type: unsigned
  default: 8080
  validate: port
- key: log.level
  type: string
  default: info
  env_name: LOG_LEVEL
  flag_name: log-level
  validate:
    one-of: [debug, info, warn, error]
- key: features
  type: string-list
";

/// Test environment with an isolated temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// A command for the autumn binary with inherited configuration removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("autumn").expect("Failed to find autumn binary");
        cmd.current_dir(&self.temp_path);
        for var in TOOL_VARS {
            cmd.env_remove(var);
        }
        for (name, _) in std::env::vars() {
            if name.starts_with("CONFIG_") || name == "LOG_LEVEL" {
                cmd.env_remove(name);
            }
        }
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file relative to the temporary directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Write the sample manifest as `items.yaml`.
    pub fn sample_manifest(&self) -> PathBuf {
        self.write("items.yaml", SAMPLE_MANIFEST)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
