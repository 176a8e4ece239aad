//! Declaring configuration items in a YAML manifest.
//!
//! A manifest is a list of entries, one per item:
//!
//! ```yaml
//! - key: server.host
//!   type: string
//!   default: localhost
//!   description: The interface to listen on
//! - key: server.port
//!   type: unsigned
//!   default: 8080
//!   env_name: PORT
//!   validate: port
//! - key: log.level
//!   type: string
//!   default: info
//!   validate:
//!     one-of: [debug, info, warn, error]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::ConfigItem;
use crate::validation::{in_range, no_validation, non_empty, one_of, port, Validator};
use crate::value::ValueKind;

/// A parsed manifest.
///
/// # Examples
///
/// ```
/// use autumn::{ItemManifest, Registry};
///
/// let manifest = ItemManifest::from_yaml(
///     "- key: server.port\n  type: unsigned\n  default: 8080\n  validate: port\n",
/// )
/// .unwrap();
/// let registry = Registry::setup(manifest.into_items().unwrap()).unwrap();
/// assert_eq!(registry.get("server.port").unwrap().env_name(), "CONFIG_SERVER_PORT");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ItemManifest {
    /// The declared entries, in order.
    pub entries: Vec<ManifestEntry>,
}

/// One declared item.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// The item key.
    pub key: String,

    /// The item type.
    #[serde(rename = "type")]
    pub kind: ValueKind,

    /// The default value; the type's zero value when omitted.
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,

    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Environment variable override.
    #[serde(default)]
    pub env_name: Option<String>,

    /// Flag name override.
    #[serde(default)]
    pub flag_name: Option<String>,

    /// Built-in validator.
    #[serde(default)]
    pub validate: ValidatorSpec,
}

/// Built-in validators available to manifests.
///
/// Written as a bare name (`none`, `non-empty`, `port`) or as a single-key
/// mapping (`one-of: [..]`, `range: { min, max }`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValidatorSpec {
    /// A validator without parameters.
    Named(NamedValidator),
    /// Accept one of the listed values.
    OneOf {
        /// The accepted values.
        #[serde(rename = "one-of")]
        one_of: Vec<String>,
    },
    /// Accept numbers within the inclusive range.
    Range {
        /// The accepted bounds.
        range: RangeSpec,
    },
}

/// Parameterless built-in validators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedValidator {
    /// No validation.
    #[default]
    None,
    /// Reject empty strings and lists.
    NonEmpty,
    /// Accept 1 through 65535.
    Port,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSpec {
    /// Lowest accepted value.
    pub min: i64,
    /// Highest accepted value.
    pub max: i64,
}

impl Default for ValidatorSpec {
    fn default() -> Self {
        Self::Named(NamedValidator::None)
    }
}

impl ValidatorSpec {
    /// Build the validator described here.
    #[must_use]
    pub fn build(&self) -> Validator {
        match self {
            Self::Named(NamedValidator::None) => std::sync::Arc::new(no_validation),
            Self::Named(NamedValidator::NonEmpty) => non_empty(),
            Self::Named(NamedValidator::Port) => port(),
            Self::OneOf { one_of: choices } => one_of(choices.iter().cloned()),
            Self::Range { range } => in_range(i128::from(range.min), i128::from(range.max)),
        }
    }
}

impl ItemManifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the text does not match the schema.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read manifest: {e}"),
        })?;
        Self::from_yaml(&contents)
    }

    /// Convert every entry into a [`ConfigItem`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a default does not fit its type.
    pub fn into_items(self) -> Result<Vec<ConfigItem>> {
        self.entries.into_iter().map(ManifestEntry::into_item).collect()
    }
}

impl ManifestEntry {
    /// Convert this entry into a [`ConfigItem`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if the default does not fit the type.
    pub fn into_item(self) -> Result<ConfigItem> {
        let default = match &self.default {
            None | Some(serde_yaml::Value::Null) => self.kind.zero(),
            Some(value) => self.kind.coerce(value).map_err(|message| Error::InvalidValue {
                key: self.key.clone(),
                source_name: "manifest default".to_string(),
                message,
            })?,
        };

        let mut item = ConfigItem::with_validator(self.key, default, self.validate.build());
        if let Some(description) = self.description {
            item = item.with_description(description);
        }
        if let Some(name) = self.env_name {
            item = item.with_env_name(name);
        }
        if let Some(name) = self.flag_name {
            item = item.with_flag_name(name);
        }
        Ok(item)
    }
}
