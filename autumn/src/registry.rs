//! Registry setup and command-line flag registration.
//!
//! [`Registry::setup`] checks a list of items once, at program start, and
//! refuses it on the first problem: a malformed key, a repeated key, or two
//! items that would share an environment variable or a flag.

use std::collections::HashMap;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::{Error, Result};
use crate::item::ConfigItem;
use crate::naming::{validate_env_name, validate_flag_name, validate_key};
use crate::value::ValueKind;

/// A checked, ordered set of configuration items.
///
/// # Examples
///
/// ```
/// use autumn::{no_validation, ConfigItem, Registry};
///
/// let registry = Registry::setup(vec![
///     ConfigItem::new("server.host", "localhost", no_validation),
///     ConfigItem::new("server.port", 8080u64, no_validation),
/// ])
/// .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.get("server.port").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<ConfigItem>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Check `items` and build a registry that keeps their order.
    ///
    /// # Errors
    ///
    /// Returns the first of: [`Error::InvalidKey`], [`Error::DuplicateKey`],
    /// [`Error::InvalidEnvName`], [`Error::InvalidFlagName`],
    /// [`Error::DuplicateEnvName`], [`Error::DuplicateFlagName`].
    pub fn setup(items: Vec<ConfigItem>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        let mut env_names: HashMap<String, usize> = HashMap::new();
        let mut flag_names: HashMap<String, usize> = HashMap::new();

        for (position, item) in items.iter().enumerate() {
            let key = item.key();

            validate_key(key).map_err(|reason| Error::InvalidKey {
                key: key.to_string(),
                reason,
            })?;

            if index.insert(key.to_string(), position).is_some() {
                return Err(Error::DuplicateKey {
                    key: key.to_string(),
                });
            }

            if let Some(name) = item.env_name_override() {
                validate_env_name(name).map_err(|reason| Error::InvalidEnvName {
                    key: key.to_string(),
                    name: name.to_string(),
                    reason,
                })?;
            }

            if let Some(name) = item.flag_name_override() {
                validate_flag_name(name).map_err(|reason| Error::InvalidFlagName {
                    key: key.to_string(),
                    name: name.to_string(),
                    reason,
                })?;
            }

            let env_name = item.env_name();
            if let Some(&first) = env_names.get(&env_name) {
                return Err(Error::DuplicateEnvName {
                    name: env_name,
                    first: items[first].key().to_string(),
                    second: key.to_string(),
                });
            }
            env_names.insert(env_name, position);

            let flag_name = item.flag_name().to_string();
            if let Some(&first) = flag_names.get(&flag_name) {
                return Err(Error::DuplicateFlagName {
                    name: flag_name,
                    first: items[first].key().to_string(),
                    second: key.to_string(),
                });
            }
            flag_names.insert(flag_name, position);
        }

        log::debug!("registry set up with {} configuration items", items.len());
        Ok(Self { items, index })
    }

    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigItem> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// Iterate over items in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigItem> {
        self.items.iter()
    }

    /// Iterate over keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(ConfigItem::key)
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build one `clap` argument per item.
    ///
    /// Each argument uses the item key as its id and the effective flag name
    /// as its long name. No default is attached, so a value is only present
    /// when the user passed the flag. A bare `bool` flag means `true`, and a
    /// `string-list` flag may be given more than once.
    pub fn flag_args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.items.iter().map(|item| {
            let mut help = item.description().to_string();
            if !help.is_empty() {
                help.push(' ');
            }
            help.push_str(&format!("[default: {}]", item.default()));

            let arg = Arg::new(item.key().to_string())
                .long(item.flag_name().to_string())
                .value_name(item.kind().name().to_uppercase())
                .help(help)
                .required(false);

            match item.kind() {
                ValueKind::Bool => arg
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .default_missing_value("true"),
                ValueKind::StringList => arg.action(ArgAction::Append),
                _ => arg.action(ArgAction::Set),
            }
        })
    }

    /// Add every item's flag to `command`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::{no_validation, ConfigItem, FlagValues, Registry};
    /// use clap::Command;
    ///
    /// let registry = Registry::setup(vec![
    ///     ConfigItem::new("server.port", 8080u64, no_validation),
    /// ])
    /// .unwrap();
    ///
    /// let matches = registry
    ///     .augment_command(Command::new("app"))
    ///     .try_get_matches_from(["app", "--server.port", "9090"])
    ///     .unwrap();
    /// let flags = FlagValues::from_matches(&matches, &registry);
    /// assert_eq!(flags.get("server.port"), Some("9090"));
    /// ```
    #[must_use]
    pub fn augment_command(&self, command: Command) -> Command {
        command.args(self.flag_args())
    }

    /// Build a standalone command named `name` that accepts only item flags.
    #[must_use]
    pub fn command(&self, name: &'static str) -> Command {
        self.augment_command(
            Command::new(name)
                .no_binary_name(true)
                .disable_help_flag(true),
        )
    }

    /// Parse `args` (without a binary name) against the item flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Flags`] for unknown flags or missing values.
    pub fn parse_flags<I, T>(&self, args: I) -> Result<FlagValues>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = self.command("flags").try_get_matches_from(args)?;
        Ok(FlagValues::from_matches(&matches, self))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ConfigItem;
    type IntoIter = std::slice::Iter<'a, ConfigItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Raw command-line values, by item key.
///
/// Values are kept as text, one entry per occurrence; the loader converts
/// them to each item's type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: HashMap<String, Vec<String>>,
}

impl FlagValues {
    /// Collect the flags the user supplied.
    ///
    /// `matches` must come from a command built with
    /// [`Registry::augment_command`] or [`Registry::command`].
    #[must_use]
    pub fn from_matches(matches: &ArgMatches, registry: &Registry) -> Self {
        let values = registry
            .keys()
            .filter_map(|key| {
                let occurrences: Vec<String> = matches
                    .try_get_many::<String>(key)
                    .ok()
                    .flatten()?
                    .cloned()
                    .collect();
                Some((key.to_string(), occurrences))
            })
            .collect();
        Self { values }
    }

    /// Build flag values directly from `(key, value)` pairs.
    ///
    /// A key that appears more than once collects every value, in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_default().push(value.into());
        }
        Self { values }
    }

    /// The last raw value supplied for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).last().map(String::as_str)
    }

    /// Every raw value supplied for `key`, in command-line order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of supplied flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no flags were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
