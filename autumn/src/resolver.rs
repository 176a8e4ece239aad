//! The reference loader: resolves every registered item by precedence.
//!
//! For each item, sources are consulted from highest to lowest precedence
//! and the first one that defines the key wins:
//!
//! 1. Command-line flag (effective flag name)
//! 2. Environment variable (effective environment name)
//! 3. Secrets file
//! 4. Profile files, last-declared profile first
//! 5. Base file
//! 6. The item's default
//!
//! Values are converted to the item's kind as they are found. After every
//! item is resolved, validators run on the resolved values.

use std::env::VarError;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::handlers::Handlers;
use crate::item::ConfigItem;
use crate::registry::{FlagValues, Registry};
use crate::resolved::{ResolvedConfig, ResolvedEntry};
use crate::source::{EnvSource, FileLayers, ProcessEnv, SourceKind};
use crate::value::{ConfigValue, ValueKind};

/// Where the loader looks for configuration files, and which profiles apply.
///
/// # Examples
///
/// ```
/// use autumn::LoaderOptions;
///
/// let options = LoaderOptions::new("/etc/myapp").with_profiles(["base", "dev"]);
/// assert_eq!(options.profiles, vec!["base", "dev"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Directory holding `config.*` and `config-<profile>.*`.
    pub config_dir: PathBuf,
    /// Directory holding `secrets.*`; defaults to `config_dir`.
    pub secrets_dir: Option<PathBuf>,
    /// Active profiles, in declaration order. Later profiles win.
    pub profiles: Vec<String>,
}

impl LoaderOptions {
    /// Options reading from `config_dir` with no profiles.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets_dir: None,
            profiles: Vec::new(),
        }
    }

    /// Set the secrets directory.
    #[must_use]
    pub fn with_secrets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secrets_dir = Some(dir.into());
        self
    }

    /// Set the active profiles.
    #[must_use]
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// The secrets directory in effect.
    #[must_use]
    pub fn effective_secrets_dir(&self) -> &Path {
        self.secrets_dir.as_deref().unwrap_or(&self.config_dir)
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Resolves a [`Registry`] against flags, environment and files.
///
/// By default the process environment is used, no flags are set, and files
/// are discovered on disk during [`Loader::load`].
///
/// # Examples
///
/// ```
/// use autumn::{
///     no_validation, ConfigItem, FileLayers, FlagValues, Handlers, Loader, LoaderOptions,
///     Registry, SourceKind,
/// };
/// use std::collections::HashMap;
///
/// let registry = Registry::setup(vec![
///     ConfigItem::new("server.host", "localhost", no_validation),
///     ConfigItem::new("server.port", 8080u64, no_validation),
/// ])
/// .unwrap();
///
/// let env = HashMap::from([("CONFIG_SERVER_HOST".to_string(), "example.org".to_string())]);
/// let config = Loader::new(LoaderOptions::default())
///     .with_env(env)
///     .with_flags(FlagValues::from_pairs([("server.port", "9090")]))
///     .with_layers(FileLayers::new())
///     .load(&registry, &Handlers::strict())
///     .unwrap();
///
/// assert_eq!(config.string("server.host").unwrap(), "example.org");
/// assert_eq!(config.source("server.port"), Some(&SourceKind::Flag));
/// ```
pub struct Loader {
    options: LoaderOptions,
    env: Box<dyn EnvSource>,
    flags: FlagValues,
    layers: Option<FileLayers>,
}

impl Loader {
    /// A loader for `options`.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            env: Box::new(ProcessEnv),
            flags: FlagValues::default(),
            layers: None,
        }
    }

    /// Read environment variables from `env` instead of the process.
    #[must_use]
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Use the given command-line values.
    #[must_use]
    pub fn with_flags(mut self, flags: FlagValues) -> Self {
        self.flags = flags;
        self
    }

    /// Use preloaded file layers instead of discovering files on disk.
    #[must_use]
    pub fn with_layers(mut self, layers: FileLayers) -> Self {
        self.layers = Some(layers);
        self
    }

    /// The options this loader was built with.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Resolve and validate every item in `registry`.
    ///
    /// Values that cannot be converted to an item's type are reported to the
    /// fail handler; if it continues, that source is skipped. Every
    /// validation failure is reported to the warn handler, followed by one
    /// [`Error::ValidationFailed`] to the fail handler.
    ///
    /// # Errors
    ///
    /// Returns the error the fail handler aborted on, or an error from file
    /// discovery.
    pub fn load(&self, registry: &Registry, handlers: &Handlers) -> Result<ResolvedConfig> {
        let discovered;
        let layers = match &self.layers {
            Some(layers) => layers,
            None => {
                discovered = FileLayers::discover(&self.options, handlers)?;
                &discovered
            }
        };

        let mut entries = Vec::with_capacity(registry.len());
        for item in registry {
            let entry = self.resolve_item(item, layers, handlers)?;
            log::debug!("{} resolved from {}", entry.key, entry.source);
            entries.push(entry);
        }

        validate_entries(registry, &entries, handlers)?;
        Ok(ResolvedConfig::new(entries))
    }

    /// Resolve a single item, highest precedence first.
    fn resolve_item(
        &self,
        item: &ConfigItem,
        layers: &FileLayers,
        handlers: &Handlers,
    ) -> Result<ResolvedEntry> {
        let key = item.key();
        let kind = item.kind();
        let found = |value: ConfigValue, source: SourceKind| ResolvedEntry {
            key: key.to_string(),
            value,
            source,
        };
        let invalid = |source_name: String, message: String| Error::InvalidValue {
            key: key.to_string(),
            source_name,
            message,
        };

        let occurrences = self.flags.get_all(key);
        if !occurrences.is_empty() {
            match parse_occurrences(kind, occurrences) {
                Ok(value) => return Ok(found(value, SourceKind::Flag)),
                Err(message) => {
                    handlers.check(invalid(format!("flag --{}", item.flag_name()), message))?;
                }
            }
        }

        let env_name = item.env_name();
        let env_source = || format!("environment variable {env_name}");
        match self.env.get_var(&env_name) {
            Ok(raw) if !raw.is_empty() => match kind.parse(&raw) {
                Ok(value) => return Ok(found(value, SourceKind::Environment)),
                Err(message) => handlers.check(invalid(env_source(), message))?,
            },
            Ok(_) | Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(raw)) => handlers.check(invalid(
                env_source(),
                format!("{raw:?} is not valid UTF-8"),
            ))?,
        }

        for layer in layers.by_precedence() {
            let Some(raw) = layer.lookup(key) else {
                continue;
            };
            match kind.coerce(raw) {
                Ok(value) => return Ok(found(value, layer.kind().clone())),
                Err(message) => handlers.check(invalid(layer.describe(), message))?,
            }
        }

        Ok(found(item.default().clone(), SourceKind::Default))
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("options", &self.options)
            .field("flags", &self.flags)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

/// Parse every occurrence of a flag. List occurrences concatenate; for any
/// other kind only one occurrence is possible.
fn parse_occurrences(
    kind: ValueKind,
    occurrences: &[String],
) -> std::result::Result<ConfigValue, String> {
    if kind != ValueKind::StringList {
        let last = occurrences.last().map_or("", String::as_str);
        return kind.parse(last);
    }

    let mut elements = Vec::new();
    for raw in occurrences {
        if let ConfigValue::StringList(list) = kind.parse(raw)? {
            elements.extend(list);
        }
    }
    Ok(ConfigValue::StringList(elements))
}

/// Run every item's validator on its resolved value.
fn validate_entries(
    registry: &Registry,
    entries: &[ResolvedEntry],
    handlers: &Handlers,
) -> Result<()> {
    let mut failed = 0;

    for (item, entry) in registry.iter().zip(entries) {
        if let Err(err) = item.validator().validate(&entry.key, &entry.value) {
            failed += 1;
            let err = Error::Validation {
                key: entry.key.clone(),
                message: err.message,
            };
            handlers.warn(&err.to_string());
        }
    }

    if failed > 0 {
        handlers.check(Error::ValidationFailed { count: failed })?;
    }
    Ok(())
}
