//! Error types for the autumn library.
//!
//! This module provides the error hierarchy for registry setup, value
//! conversion, source loading and validation, using `thiserror` for
//! ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

/// Result type alias for operations that may fail with an autumn error.
///
/// # Examples
///
/// ```
/// use autumn::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the autumn library.
///
/// Registry errors (`InvalidKey`, `DuplicateKey`, ...) are raised by
/// [`Registry::setup`](crate::Registry::setup). Load errors are handed to the
/// fail handler during [`Loader::load`](crate::Loader::load) before they are
/// returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration key does not follow the key syntax.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },

    /// Two items were declared with the same key.
    #[error("duplicate configuration key '{key}'")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// An environment variable name override is malformed.
    #[error("invalid environment variable name '{name}' for key '{key}': {reason}")]
    InvalidEnvName {
        /// The item key.
        key: String,
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// A command-line flag name override is malformed.
    #[error("invalid flag name '{name}' for key '{key}': {reason}")]
    InvalidFlagName {
        /// The item key.
        key: String,
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// Two items resolve to the same environment variable.
    #[error("environment variable {name} is used by both '{first}' and '{second}'")]
    DuplicateEnvName {
        /// The shared environment variable name.
        name: String,
        /// The key declared first.
        first: String,
        /// The key declared second.
        second: String,
    },

    /// Two items resolve to the same command-line flag.
    #[error("flag --{name} is used by both '{first}' and '{second}'")]
    DuplicateFlagName {
        /// The shared flag name.
        name: String,
        /// The key declared first.
        first: String,
        /// The key declared second.
        second: String,
    },

    /// A source supplied a value that cannot be converted to the item's type.
    #[error("invalid value for '{key}' from {source_name}: {message}")]
    InvalidValue {
        /// The item key.
        key: String,
        /// The source that supplied the value.
        source_name: String,
        /// What went wrong.
        message: String,
    },

    /// A validator rejected a resolved value.
    #[error("validation failed for '{key}': {message}")]
    Validation {
        /// The item key.
        key: String,
        /// The validator's message.
        message: String,
    },

    /// One or more items failed validation during a load.
    #[error("{count} configuration item(s) failed validation")]
    ValidationFailed {
        /// How many items failed.
        count: usize,
    },

    /// A lookup named a key that is not registered.
    #[error("unknown configuration key '{key}'")]
    UnknownKey {
        /// The requested key.
        key: String,
    },

    /// A typed lookup requested the wrong kind of value.
    #[error("type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The requested key.
        key: String,
        /// The kind the caller asked for.
        expected: ValueKind,
        /// The kind the item actually holds.
        found: ValueKind,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("malformed configuration source {}: {message}", path.display())]
    Source {
        /// The file that failed to parse.
        path: PathBuf,
        /// The parser's message.
        message: String,
    },

    /// Command-line flags could not be parsed.
    #[error("flag parsing failed: {0}")]
    Flags(#[from] clap::Error),

    /// A manifest could not be deserialized.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_yaml::Error),
}

impl Error {
    /// Check if the error was raised while setting up a registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::Error;
    ///
    /// let err = Error::DuplicateKey { key: "server.port".to_string() };
    /// assert!(err.is_setup_error());
    /// ```
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey { .. }
                | Self::DuplicateKey { .. }
                | Self::InvalidEnvName { .. }
                | Self::InvalidFlagName { .. }
                | Self::DuplicateEnvName { .. }
                | Self::DuplicateFlagName { .. }
        )
    }

    /// Check if the error reports a validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::ValidationFailed { .. })
    }
}
