//! Environment variable lookup.
//!
//! The loader reads environment variables through [`EnvSource`] so tests can
//! supply a fixed environment instead of mutating the process one.

use std::collections::HashMap;
use std::env::{self, VarError};

/// A read-only view of environment variables.
///
/// Lookups report like [`std::env::var`]: an unset variable is
/// [`VarError::NotPresent`], and a value that is not valid UTF-8 is
/// [`VarError::NotUnicode`].
///
/// # Examples
///
/// ```
/// use autumn::EnvSource;
/// use std::collections::HashMap;
/// use std::env::VarError;
///
/// let env = HashMap::from([("CONFIG_SERVER_HOST".to_string(), "example.org".to_string())]);
/// assert_eq!(env.get_var("CONFIG_SERVER_HOST"), Ok("example.org".to_string()));
/// assert_eq!(env.get_var("CONFIG_SERVER_PORT"), Err(VarError::NotPresent));
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource {
    /// The value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::NotPresent`] if `name` is unset and
    /// [`VarError::NotUnicode`] if its value is not valid UTF-8.
    fn get_var(&self, name: &str) -> Result<String, VarError>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get_var(&self, name: &str) -> Result<String, VarError> {
        env::var(name)
    }
}

impl EnvSource for HashMap<String, String> {
    fn get_var(&self, name: &str) -> Result<String, VarError> {
        self.get(name).cloned().ok_or(VarError::NotPresent)
    }
}
