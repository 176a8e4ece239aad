//! Typed configuration values.
//!
//! A [`ConfigValue`] carries both a value and its type. The variant of an
//! item's default fixes the [`ValueKind`] every source must convert to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a configuration value.
///
/// # Examples
///
/// ```
/// use autumn::ValueKind;
///
/// assert_eq!(ValueKind::parse_name("string-list"), Some(ValueKind::StringList));
/// assert_eq!(ValueKind::StringList.to_string(), "string-list");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// UTF-8 text.
    String,
    /// Unsigned 64-bit integer.
    Unsigned,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// Boolean flag.
    Bool,
    /// Ordered list of strings.
    StringList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed configuration value.
///
/// Serializes untagged, so `ConfigValue::Unsigned(8080)` renders as `8080`
/// in JSON and YAML.
///
/// # Examples
///
/// ```
/// use autumn::{ConfigValue, ValueKind};
///
/// let value = ConfigValue::from(8080u64);
/// assert_eq!(value.kind(), ValueKind::Unsigned);
/// assert_eq!(value.to_string(), "8080");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// UTF-8 text.
    String(String),
    /// Unsigned 64-bit integer.
    Unsigned(u64),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
    /// Ordered list of strings.
    StringList(Vec<String>),
}

impl ConfigValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Unsigned(_) => ValueKind::Unsigned,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::StringList(_) => ValueKind::StringList,
        }
    }

    /// Returns the string if this is a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is an `Unsigned` value.
    #[must_use]
    pub const fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is an `Integer` value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a `Float` value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Bool` value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the list if this is a `StringList` value.
    #[must_use]
    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::StringList(list) => {
                for (i, element) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(&escape_list_element(element))?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(u64::from(value))
    }
}

impl From<u16> for ConfigValue {
    fn from(value: u16) -> Self {
        Self::Unsigned(u64::from(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        Self::StringList(value.into_iter().map(str::to_string).collect())
    }
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Unsigned,
        Self::Integer,
        Self::Float,
        Self::Bool,
        Self::StringList,
    ];

    /// Returns the kebab-case name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Unsigned => "unsigned",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::StringList => "string-list",
        }
    }

    /// Looks up a kind by its kebab-case name.
    #[must_use]
    pub fn parse_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the zero value of this kind.
    #[must_use]
    pub fn zero(self) -> ConfigValue {
        match self {
            Self::String => ConfigValue::String(String::new()),
            Self::Unsigned => ConfigValue::Unsigned(0),
            Self::Integer => ConfigValue::Integer(0),
            Self::Float => ConfigValue::Float(0.0),
            Self::Bool => ConfigValue::Bool(false),
            Self::StringList => ConfigValue::StringList(Vec::new()),
        }
    }

    /// Parse a raw string, as supplied by a flag or environment variable.
    ///
    /// Booleans accept `true/false/1/0/yes/no/on/off` in any case. String
    /// lists are comma-separated; segments are trimmed and empty segments
    /// dropped. Inside a segment, `\,` is a literal comma, `\\` a literal
    /// backslash, and a backslash before whitespace keeps that whitespace
    /// from being trimmed. Any other backslash is kept as is.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `raw` is not a valid value of
    /// this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::{ConfigValue, ValueKind};
    ///
    /// assert_eq!(ValueKind::Bool.parse("YES").unwrap(), ConfigValue::Bool(true));
    /// assert_eq!(
    ///     ValueKind::StringList.parse("dev, local").unwrap(),
    ///     ConfigValue::from(vec!["dev", "local"]),
    /// );
    /// assert!(ValueKind::Unsigned.parse("-1").is_err());
    /// ```
    pub fn parse(self, raw: &str) -> Result<ConfigValue, String> {
        match self {
            Self::String => Ok(ConfigValue::String(raw.to_string())),
            Self::Unsigned => raw
                .trim()
                .parse::<u64>()
                .map(ConfigValue::Unsigned)
                .map_err(|e| format!("'{raw}' is not an unsigned integer: {e}")),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(ConfigValue::Integer)
                .map_err(|e| format!("'{raw}' is not an integer: {e}")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|e| format!("'{raw}' is not a number: {e}")),
            Self::Bool => parse_bool(raw).map(ConfigValue::Bool),
            Self::StringList => Ok(ConfigValue::StringList(split_list(raw))),
        }
    }

    /// Convert a value read from a YAML or JSON document.
    ///
    /// Strings are accepted for every kind and go through [`ValueKind::parse`].
    /// Numbers and booleans render as text for `String`. Sequences of scalars
    /// become string lists. Mappings and nulls are rejected.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the value cannot be
    /// represented as this kind.
    pub fn coerce(self, value: &serde_yaml::Value) -> Result<ConfigValue, String> {
        use serde_yaml::Value;

        match (self, value) {
            (_, Value::String(s)) => self.parse(s),
            (_, Value::Tagged(tagged)) => self.coerce(&tagged.value),
            (_, Value::Null) => Err("null is not a value".to_string()),
            (_, Value::Mapping(_)) => Err(format!("expected {self}, found a mapping")),
            (Self::String, Value::Number(n)) => Ok(ConfigValue::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Ok(ConfigValue::String(b.to_string())),
            (Self::Unsigned, Value::Number(n)) => n
                .as_u64()
                .map(ConfigValue::Unsigned)
                .ok_or_else(|| format!("{n} is not an unsigned integer")),
            (Self::Integer, Value::Number(n)) => n
                .as_i64()
                .map(ConfigValue::Integer)
                .ok_or_else(|| format!("{n} is not a 64-bit integer")),
            (Self::Float, Value::Number(n)) => n
                .as_f64()
                .map(ConfigValue::Float)
                .ok_or_else(|| format!("{n} is not a number")),
            (Self::Bool, Value::Bool(b)) => Ok(ConfigValue::Bool(*b)),
            (Self::StringList, Value::Sequence(items)) => items
                .iter()
                .map(|item| match Self::String.coerce(item)? {
                    ConfigValue::String(s) => Ok(s),
                    other => Err(format!("unexpected list element {other}")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigValue::StringList),
            (Self::StringList, Value::Number(_) | Value::Bool(_)) => {
                Self::String.coerce(value).map(|v| ConfigValue::StringList(vec![v.to_string()]))
            }
            (_, Value::Sequence(_)) => Err(format!("expected {self}, found a list")),
            (_, other) => Err(format!("expected {self}, found {other:?}")),
        }
    }
}

/// Escape a list element so [`split_list`] reads it back unchanged.
fn escape_list_element(element: &str) -> String {
    let leading = element.len() - element.trim_start().len();
    let trailing_start = element.trim_end().len().max(leading);

    let mut escaped = String::with_capacity(element.len());
    for (i, c) in element.char_indices() {
        let edge_space = c.is_whitespace() && (i < leading || i >= trailing_start);
        if c == ',' || c == '\\' || edge_space {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Split comma-separated text into trimmed, non-empty elements.
fn split_list(raw: &str) -> Vec<String> {
    // (char, escaped) pairs of the current segment
    let mut segment: Vec<(char, bool)> = Vec::new();
    let mut elements = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&next) if next == ',' || next == '\\' || next.is_whitespace() => {
                    segment.push((next, true));
                    chars.next();
                }
                _ => segment.push((c, false)),
            },
            ',' => elements.extend(finish_segment(&mut segment)),
            _ => segment.push((c, false)),
        }
    }
    elements.extend(finish_segment(&mut segment));
    elements
}

/// Trim unescaped whitespace from both ends and return the text, if any.
fn finish_segment(segment: &mut Vec<(char, bool)>) -> Option<String> {
    let trimmable = |&(c, escaped): &(char, bool)| c.is_whitespace() && !escaped;
    let start = segment.iter().position(|p| !trimmable(p));
    let end = segment.iter().rposition(|p| !trimmable(p));
    let text = match (start, end) {
        (Some(start), Some(end)) => Some(segment[start..=end].iter().map(|&(c, _)| c).collect()),
        _ => None,
    };
    segment.clear();
    text
}

/// Parse a boolean from its textual forms.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value: '{raw}' (expected true/false/1/0/yes/no/on/off)"
        )),
    }
}
