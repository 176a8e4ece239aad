//! Validation of resolved configuration values.
//!
//! Every [`ConfigItem`](crate::ConfigItem) carries a validator. A validator
//! receives the item's key together with its resolved value, so it can check
//! the value directly and still name the key in its message. Use
//! [`no_validation`] for items that accept any value of their type.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value::ConfigValue;

/// A rejected value, as reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable reason for the rejection.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A check run against an item's resolved value.
///
/// Any `Fn(&str, &ConfigValue) -> Result<(), ValidationError>` closure or
/// function that is `Send + Sync` implements this trait.
///
/// # Examples
///
/// ```
/// use autumn::{ConfigValue, Validate, ValidationError};
///
/// let even = |key: &str, value: &ConfigValue| match value.as_unsigned() {
///     Some(n) if n % 2 == 0 => Ok(()),
///     _ => Err(ValidationError::new(format!("{key} must be even"))),
/// };
///
/// assert!(even.validate("workers", &ConfigValue::Unsigned(4)).is_ok());
/// assert!(even.validate("workers", &ConfigValue::Unsigned(3)).is_err());
/// ```
pub trait Validate: Send + Sync {
    /// Check `value`, resolved for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the value is unacceptable.
    fn validate(&self, key: &str, value: &ConfigValue) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&str, &ConfigValue) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, key: &str, value: &ConfigValue) -> Result<(), ValidationError> {
        self(key, value)
    }
}

/// Shared handle to a validator.
pub type Validator = Arc<dyn Validate>;

/// The validator for items that need no validation. Always succeeds.
///
/// # Errors
///
/// Never returns an error.
pub fn no_validation(_key: &str, _value: &ConfigValue) -> Result<(), ValidationError> {
    Ok(())
}

/// Rejects empty strings and empty lists.
#[must_use]
pub fn non_empty() -> Validator {
    Arc::new(|key: &str, value: &ConfigValue| {
        let empty = match value {
            ConfigValue::String(s) => s.trim().is_empty(),
            ConfigValue::StringList(list) => list.is_empty(),
            _ => false,
        };
        if empty {
            Err(ValidationError::new(format!("{key} must not be empty")))
        } else {
            Ok(())
        }
    })
}

/// Accepts numbers between 1 and 65535.
#[must_use]
pub fn port() -> Validator {
    in_range(1, 65535)
}

/// Accepts numbers within `min..=max`.
///
/// Applies to unsigned, integer and float values; other kinds are rejected.
#[must_use]
pub fn in_range(min: i128, max: i128) -> Validator {
    Arc::new(move |key: &str, value: &ConfigValue| {
        let within = match value {
            ConfigValue::Unsigned(n) => (min..=max).contains(&i128::from(*n)),
            ConfigValue::Integer(n) => (min..=max).contains(&i128::from(*n)),
            #[allow(clippy::cast_precision_loss)]
            ConfigValue::Float(n) => *n >= min as f64 && *n <= max as f64,
            other => {
                return Err(ValidationError::new(format!(
                    "{key} must be numeric, found {}",
                    other.kind()
                )))
            }
        };
        if within {
            Ok(())
        } else {
            Err(ValidationError::new(format!(
                "{key} must be between {min} and {max}, found {value}"
            )))
        }
    })
}

/// Accepts values whose textual form is one of `choices`.
///
/// For string lists, every element must be one of `choices`.
#[must_use]
pub fn one_of<I, S>(choices: I) -> Validator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
    Arc::new(move |key: &str, value: &ConfigValue| {
        let offending = match value {
            ConfigValue::StringList(list) => list.iter().find(|v| !choices.contains(v)).cloned(),
            other => {
                let text = other.to_string();
                (!choices.contains(&text)).then_some(text)
            }
        };
        match offending {
            None => Ok(()),
            Some(found) => Err(ValidationError::new(format!(
                "{key} must be one of [{}], found '{found}'",
                choices.join(", ")
            ))),
        }
    })
}

/// Debug placeholder for validators, which are opaque closures.
pub(crate) struct OpaqueValidator;

impl fmt::Debug for OpaqueValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<validator>")
    }
}
