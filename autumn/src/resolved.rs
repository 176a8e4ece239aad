//! The result of a load: one resolved value per registered item.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::source::SourceKind;
use crate::value::{ConfigValue, ValueKind};

/// A resolved value and the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    /// The item key.
    pub key: String,
    /// The resolved value, always of the item's kind.
    pub value: ConfigValue,
    /// The source that supplied the value.
    pub source: SourceKind,
}

/// Resolved configuration, in registry order.
///
/// Serializes as an ordered map from key to value.
///
/// # Examples
///
/// ```
/// use autumn::{no_validation, ConfigItem, FileLayers, Handlers, Loader, LoaderOptions, Registry};
/// use std::collections::HashMap;
///
/// let registry = Registry::setup(vec![
///     ConfigItem::new("server.port", 8080u64, no_validation),
/// ])
/// .unwrap();
///
/// let config = Loader::new(LoaderOptions::default())
///     .with_env(HashMap::new())
///     .with_layers(FileLayers::new())
///     .load(&registry, &Handlers::strict())
///     .unwrap();
///
/// assert_eq!(config.unsigned("server.port").unwrap(), 8080);
/// assert!(config.string("server.port").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedEntry>,
    index: HashMap<String, usize>,
}

impl ResolvedConfig {
    pub(crate) fn new(entries: Vec<ResolvedEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// The entry for `key`.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&ResolvedEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// The value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// The source that supplied `key`.
    #[must_use]
    pub fn source(&self, key: &str) -> Option<&SourceKind> {
        self.entry(key).map(|entry| &entry.source)
    }

    /// Iterate over entries in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A string value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn string(&self, key: &str) -> Result<&str> {
        self.typed(key, ValueKind::String, ConfigValue::as_str)
    }

    /// An unsigned integer value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn unsigned(&self, key: &str) -> Result<u64> {
        self.typed(key, ValueKind::Unsigned, ConfigValue::as_unsigned)
    }

    /// A signed integer value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn integer(&self, key: &str) -> Result<i64> {
        self.typed(key, ValueKind::Integer, ConfigValue::as_integer)
    }

    /// A floating point value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn float(&self, key: &str) -> Result<f64> {
        self.typed(key, ValueKind::Float, ConfigValue::as_float)
    }

    /// A boolean value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn boolean(&self, key: &str) -> Result<bool> {
        self.typed(key, ValueKind::Bool, ConfigValue::as_bool)
    }

    /// A list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::TypeMismatch`].
    pub fn string_list(&self, key: &str) -> Result<&[String]> {
        self.typed(key, ValueKind::StringList, ConfigValue::as_string_list)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: ValueKind,
        extract: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<T> {
        let value = self.get(key).ok_or_else(|| Error::UnknownKey {
            key: key.to_string(),
        })?;
        let found = value.kind();
        extract(value).ok_or_else(|| Error::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        })
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = &'a ResolvedEntry;
    type IntoIter = std::slice::Iter<'a, ResolvedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolvedConfig {
        ResolvedConfig::new(vec![
            ResolvedEntry {
                key: "server.host".into(),
                value: ConfigValue::from("localhost"),
                source: SourceKind::Default,
            },
            ResolvedEntry {
                key: "server.port".into(),
                value: ConfigValue::Unsigned(9090),
                source: SourceKind::Flag,
            },
            ResolvedEntry {
                key: "profiles".into(),
                value: ConfigValue::from(vec!["dev"]),
                source: SourceKind::Environment,
            },
        ])
    }

    #[test]
    fn test_typed_getters() {
        let config = sample();
        assert_eq!(config.string("server.host").unwrap(), "localhost");
        assert_eq!(config.unsigned("server.port").unwrap(), 9090);
        assert_eq!(config.string_list("profiles").unwrap(), ["dev".to_string()]);
    }

    #[test]
    fn test_type_mismatch() {
        let err = sample().integer("server.port").unwrap_err();
        match err {
            Error::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "server.port");
                assert_eq!(expected, ValueKind::Integer);
                assert_eq!(found, ValueKind::Unsigned);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            sample().boolean("missing"),
            Err(Error::UnknownKey { .. })
        ));
        assert!(sample().get("missing").is_none());
    }

    #[test]
    fn test_sources() {
        let config = sample();
        assert_eq!(config.source("server.port"), Some(&SourceKind::Flag));
        assert_eq!(config.source("server.host"), Some(&SourceKind::Default));
    }

    #[test]
    fn test_serializes_in_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"server.host":"localhost","server.port":9090,"profiles":["dev"]}"#
        );
    }

    #[test]
    fn test_iteration_order() {
        let keys: Vec<_> = sample().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["server.host", "server.port", "profiles"]);
    }
}
