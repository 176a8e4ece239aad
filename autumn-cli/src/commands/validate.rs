//! Command to validate an item manifest.

use crate::error::CliError;
use crate::utils::{load_registry, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Validate an item manifest.
#[derive(Args)]
pub struct ValidateCommand {
    /// Item manifest to validate
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();

        match load_registry(&self.manifest) {
            Ok(registry) => {
                for item in &registry {
                    logger.debug(&format!(
                        "{} ({}): env {}, flag --{}",
                        item.key(),
                        item.kind(),
                        item.env_name(),
                        item.flag_name()
                    ));
                }
                println!("Manifest is valid ({} items)", registry.len());
                Ok(())
            }
            Err(CliError::Library(e)) => {
                logger.error(&format!("Validation error: {e}"));
                Err(CliError::SemanticFailure("Manifest is invalid".to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
