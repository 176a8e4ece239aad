//! Configuration file discovery and loading.
//!
//! This module finds the base, profile and secrets files in a configuration
//! directory and parses them into [`Layer`]s.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::handlers::Handlers;
use crate::resolver::LoaderOptions;
use crate::source::SourceKind;

/// File extensions tried for every configuration file, in order.
pub const CONFIG_EXTENSIONS: [&str; 4] = ["yaml", "yml", "json", "properties"];

/// How a file's contents are parsed, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Properties,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|ext| ext.to_str());
        match ext {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            Some(ext) if ext.eq_ignore_ascii_case("properties") => Self::Properties,
            _ => Self::Yaml,
        }
    }
}

/// One parsed configuration file (or an in-memory equivalent).
///
/// # Examples
///
/// ```
/// use autumn::{Layer, SourceKind};
///
/// let layer = Layer::from_yaml_str(SourceKind::Base, "server:\n  port: 8080\n").unwrap();
/// assert!(layer.lookup("server.port").is_some());
/// assert!(layer.lookup("server.host").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    kind: SourceKind,
    path: Option<PathBuf>,
    root: Value,
}

impl Layer {
    /// Wrap an already parsed document.
    #[must_use]
    pub fn new(kind: SourceKind, root: Value) -> Self {
        Self {
            kind,
            path: None,
            root,
        }
    }

    /// Parse a YAML document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the text is not YAML or its top level is
    /// not a mapping.
    pub fn from_yaml_str(kind: SourceKind, contents: &str) -> Result<Self> {
        let root = parse_document(Path::new("<memory>"), contents, Format::Yaml)?;
        Ok(Self::new(kind, root))
    }

    /// Load and parse a file; `.json` files are read as JSON, `.properties`
    /// files as Java properties, anything else as YAML.
    ///
    /// Properties keys stay flat, so `server.port=80` is found through the
    /// literal-key fallback of [`Layer::lookup`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(kind: SourceKind, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read configuration file: {e}"),
        })?;

        let root = parse_document(path, &contents, Format::from_path(path))?;

        Ok(Self {
            kind,
            path: Some(path.to_path_buf()),
            root,
        })
    }

    /// Which source this layer represents.
    #[must_use]
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// The file this layer was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Human-readable origin, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("{} file {}", self.kind, path.display()),
            None => format!("{} layer", self.kind),
        }
    }

    /// Find the value for a dot-separated key.
    ///
    /// Walks nested mappings segment by segment, then falls back to a
    /// literal top-level entry named after the whole key. Nulls count as
    /// absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let nested = key
            .split('.')
            .try_fold(&self.root, |node, segment| node.get(segment));

        nested
            .or_else(|| self.root.get(key))
            .filter(|value| !value.is_null())
    }
}

/// The file-backed layers of one load.
///
/// # Examples
///
/// ```
/// use autumn::FileLayers;
///
/// let layers = FileLayers::new()
///     .base_yaml("greeting: hello\n").unwrap()
///     .profile_yaml("dev", "greeting: hi\n").unwrap();
///
/// let first = layers.by_precedence().find_map(|l| l.lookup("greeting")).unwrap();
/// assert_eq!(first.as_str(), Some("hi"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileLayers {
    secrets: Option<Layer>,
    profiles: Vec<Layer>,
    base: Option<Layer>,
}

impl FileLayers {
    /// No layers at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base layer.
    #[must_use]
    pub fn with_base(mut self, root: Value) -> Self {
        self.base = Some(Layer::new(SourceKind::Base, root));
        self
    }

    /// Append a profile layer; later profiles take priority.
    #[must_use]
    pub fn with_profile(mut self, name: impl Into<String>, root: Value) -> Self {
        self.profiles
            .push(Layer::new(SourceKind::Profile(name.into()), root));
        self
    }

    /// Set the secrets layer.
    #[must_use]
    pub fn with_secrets(mut self, root: Value) -> Self {
        self.secrets = Some(Layer::new(SourceKind::Secrets, root));
        self
    }

    /// Set the base layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] for malformed YAML.
    pub fn base_yaml(mut self, contents: &str) -> Result<Self> {
        self.base = Some(Layer::from_yaml_str(SourceKind::Base, contents)?);
        Ok(self)
    }

    /// Append a profile layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] for malformed YAML.
    pub fn profile_yaml(mut self, name: impl Into<String>, contents: &str) -> Result<Self> {
        self.profiles.push(Layer::from_yaml_str(
            SourceKind::Profile(name.into()),
            contents,
        )?);
        Ok(self)
    }

    /// Set the secrets layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] for malformed YAML.
    pub fn secrets_yaml(mut self, contents: &str) -> Result<Self> {
        self.secrets = Some(Layer::from_yaml_str(SourceKind::Secrets, contents)?);
        Ok(self)
    }

    /// Iterate layers from highest to lowest precedence: secrets, profiles
    /// in reverse declaration order, base.
    pub fn by_precedence(&self) -> impl Iterator<Item = &Layer> {
        self.secrets
            .iter()
            .chain(self.profiles.iter().rev())
            .chain(self.base.iter())
    }

    /// Number of layers present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_precedence().count()
    }

    /// Whether no layer is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discover and load all configuration files.
    ///
    /// Searches `options.config_dir` for `config.*` and `config-<profile>.*`
    /// for every requested profile, and the secrets directory (defaulting to
    /// the configuration directory) for `secrets.*`.
    ///
    /// A missing base or profile file is reported to the warn handler; a
    /// missing secrets file is not. A file that fails to parse goes to the
    /// fail handler and is skipped if loading continues.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile name is not usable in a file name, or
    /// if the fail handler aborts on a malformed file.
    pub fn discover(options: &LoaderOptions, handlers: &Handlers) -> Result<Self> {
        let config_dir = options.config_dir.as_path();
        let mut layers = Self::new();

        match find_config_file(config_dir, "config") {
            Some(path) => layers.base = load_or_report(SourceKind::Base, &path, handlers)?,
            None => handlers.warn(&format!(
                "no base configuration file config.({}) found in {}",
                CONFIG_EXTENSIONS.join("|"),
                config_dir.display()
            )),
        }

        for profile in &options.profiles {
            validate_profile_name(config_dir, profile)?;
            let stem = format!("config-{profile}");
            match find_config_file(config_dir, &stem) {
                Some(path) => {
                    let kind = SourceKind::Profile(profile.clone());
                    if let Some(layer) = load_or_report(kind, &path, handlers)? {
                        layers.profiles.push(layer);
                    }
                }
                None => handlers.warn(&format!(
                    "no configuration file {stem}.({}) found for profile '{profile}' in {}",
                    CONFIG_EXTENSIONS.join("|"),
                    config_dir.display()
                )),
            }
        }

        let secrets_dir = options.effective_secrets_dir();
        match find_config_file(secrets_dir, "secrets") {
            Some(path) => layers.secrets = load_or_report(SourceKind::Secrets, &path, handlers)?,
            None => log::debug!("no secrets file in {}", secrets_dir.display()),
        }

        log::debug!("discovered {} configuration layer(s)", layers.len());
        Ok(layers)
    }
}

/// Return the first existing `<stem>.<ext>` in `dir`.
fn find_config_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

/// Load a layer, handing parse failures to the fail handler.
fn load_or_report(kind: SourceKind, path: &Path, handlers: &Handlers) -> Result<Option<Layer>> {
    match Layer::load_file(kind, path) {
        Ok(layer) => {
            log::debug!("loaded {}", layer.describe());
            Ok(Some(layer))
        }
        Err(err) => {
            handlers.check(err)?;
            Ok(None)
        }
    }
}

/// Profile names become part of a file name.
fn validate_profile_name(dir: &Path, profile: &str) -> Result<()> {
    let reason = if profile.is_empty() {
        Some("profile name cannot be empty")
    } else if profile.contains(['/', '\\']) || profile.contains("..") {
        Some("profile name must not contain path separators or '..'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidPath {
            path: dir.join(format!("config-{profile}")),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parse a document; the top level must be a mapping (or empty).
fn parse_document(path: &Path, contents: &str, format: Format) -> Result<Value> {
    if contents.trim().is_empty() {
        return Ok(Value::Mapping(serde_yaml::Mapping::new()));
    }

    let parsed: Value = match format {
        Format::Json => serde_json::from_str(contents).map_err(|e| Error::Source {
            path: path.to_path_buf(),
            message: format!("Invalid JSON: {e}"),
        })?,
        Format::Yaml => serde_yaml::from_str(contents).map_err(|e| Error::Source {
            path: path.to_path_buf(),
            message: format!("Invalid YAML: {e}"),
        })?,
        Format::Properties => parse_properties(path, contents)?,
    };

    match parsed {
        Value::Null => Ok(Value::Mapping(serde_yaml::Mapping::new())),
        Value::Mapping(_) => Ok(parsed),
        _ => Err(Error::Source {
            path: path.to_path_buf(),
            message: "top level must be a mapping".to_string(),
        }),
    }
}

/// Read Java properties into a flat mapping of string keys to string values.
fn parse_properties(path: &Path, contents: &str) -> Result<Value> {
    let properties = java_properties::read(contents.as_bytes()).map_err(|e| Error::Source {
        path: path.to_path_buf(),
        message: format!("Invalid properties: {e}"),
    })?;

    let mapping = properties
        .into_iter()
        .map(|(key, value)| (Value::String(key), Value::String(value)))
        .collect();
    Ok(Value::Mapping(mapping))
}
