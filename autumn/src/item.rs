//! The configuration item descriptor.

use std::fmt;
use std::sync::Arc;

use crate::naming::derive_env_name;
use crate::validation::{OpaqueValidator, Validate, Validator};
use crate::value::{ConfigValue, ValueKind};

/// Describes one configurable setting.
///
/// An item is built once at program start, handed to
/// [`Registry::setup`](crate::Registry::setup) as part of a list, and is
/// read-only afterwards.
///
/// The validator is a required constructor argument. Pass
/// [`no_validation`](crate::no_validation) for items without constraints.
///
/// # Examples
///
/// ```
/// use autumn::{no_validation, ConfigItem, ConfigValue};
///
/// let item = ConfigItem::new("server.host", "localhost", no_validation)
///     .with_description("The interface to listen on");
///
/// assert_eq!(item.env_name(), "CONFIG_SERVER_HOST");
/// assert_eq!(item.flag_name(), "server.host");
/// assert_eq!(item.default(), &ConfigValue::from("localhost"));
/// ```
#[derive(Clone)]
pub struct ConfigItem {
    key: String,
    default: ConfigValue,
    description: String,
    env_name: Option<String>,
    flag_name: Option<String>,
    validate: Validator,
}

impl ConfigItem {
    /// Create an item from its key, typed default and validator.
    ///
    /// The variant of `default` fixes the type every source must convert to.
    pub fn new(
        key: impl Into<String>,
        default: impl Into<ConfigValue>,
        validate: impl Validate + 'static,
    ) -> Self {
        Self::with_validator(key, default, Arc::new(validate))
    }

    /// Create an item from an already shared validator.
    pub fn with_validator(
        key: impl Into<String>,
        default: impl Into<ConfigValue>,
        validate: Validator,
    ) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            description: String::new(),
            env_name: None,
            flag_name: None,
            validate,
        }
    }

    /// Set the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the environment variable name.
    ///
    /// An empty name restores the derived one.
    #[must_use]
    pub fn with_env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into()).filter(|n| !n.is_empty());
        self
    }

    /// Override the command-line flag name.
    ///
    /// An empty name restores the key.
    #[must_use]
    pub fn with_flag_name(mut self, name: impl Into<String>) -> Self {
        self.flag_name = Some(name.into()).filter(|n| !n.is_empty());
        self
    }

    /// The dot-separated key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The default value.
    #[must_use]
    pub const fn default(&self) -> &ConfigValue {
        &self.default
    }

    /// The type of the item, taken from its default.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    /// The description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The environment variable override, if one was given.
    #[must_use]
    pub fn env_name_override(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    /// The flag name override, if one was given.
    #[must_use]
    pub fn flag_name_override(&self) -> Option<&str> {
        self.flag_name.as_deref()
    }

    /// The effective environment variable name.
    ///
    /// The override if set, otherwise `CONFIG_` plus the uppercased key with
    /// non-alphanumeric characters replaced by `_`.
    #[must_use]
    pub fn env_name(&self) -> String {
        self.env_name
            .clone()
            .unwrap_or_else(|| derive_env_name(&self.key))
    }

    /// The effective command-line flag name: the override if set, otherwise
    /// the key.
    #[must_use]
    pub fn flag_name(&self) -> &str {
        self.flag_name.as_deref().unwrap_or(&self.key)
    }

    /// The validator.
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validate
    }
}

impl fmt::Debug for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigItem")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("env_name", &self.env_name)
            .field("flag_name", &self.flag_name)
            .field("validate", &OpaqueValidator)
            .finish()
    }
}
