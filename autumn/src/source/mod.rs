//! Configuration sources consulted by the loader.
//!
//! # Precedence
//!
//! Every key is resolved from the first source that defines it, checked from
//! highest to lowest precedence:
//!
//! 1. Command-line flag
//! 2. Environment variable
//! 3. Secrets file (`secrets.yaml`)
//! 4. Profile files (`config-<profile>.yaml`), last-declared profile first
//! 5. Base file (`config.yaml`)
//! 6. The item's default
//!
//! Each file may also be `.yml`, `.json` or `.properties`.

mod environment;
mod loader;

use std::fmt;

pub use environment::{EnvSource, ProcessEnv};
pub use loader::{FileLayers, Layer, CONFIG_EXTENSIONS};

#[cfg(test)]
pub use environment::MockEnvSource;

/// Where a resolved value came from.
///
/// # Examples
///
/// ```
/// use autumn::SourceKind;
///
/// assert_eq!(SourceKind::Profile("dev".into()).to_string(), "profile 'dev'");
/// assert!(SourceKind::Flag.precedence() > SourceKind::Environment.precedence());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A command-line flag.
    Flag,
    /// An environment variable.
    Environment,
    /// The secrets file.
    Secrets,
    /// A profile file, by profile name.
    Profile(String),
    /// The base configuration file.
    Base,
    /// The item's default value.
    Default,
}

impl SourceKind {
    /// Precedence level (higher values take priority).
    ///
    /// All profiles share one level; among them, declaration order decides.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Base => 1,
            Self::Profile(_) => 2,
            Self::Secrets => 3,
            Self::Environment => 4,
            Self::Flag => 5,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::Environment => write!(f, "environment"),
            Self::Secrets => write!(f, "secrets"),
            Self::Profile(name) => write!(f, "profile '{name}'"),
            Self::Base => write!(f, "base"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let ordered = [
            SourceKind::Default,
            SourceKind::Base,
            SourceKind::Profile("dev".into()),
            SourceKind::Secrets,
            SourceKind::Environment,
            SourceKind::Flag,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceKind::Flag.to_string(), "flag");
        assert_eq!(SourceKind::Default.to_string(), "default");
        assert_eq!(SourceKind::Profile("prod".into()).to_string(), "profile 'prod'");
    }
}
