//! Naming rules for keys, environment variables and flags.
//!
//! These rules are a bit-exact contract: any tool that sets environment
//! variables or passes flags for an autumn registry must derive the same
//! names.

/// Prefix of every derived environment variable name.
pub const ENV_PREFIX: &str = "CONFIG_";

/// Derive the environment variable name for a key.
///
/// The name is `CONFIG_` followed by the key with ASCII letters uppercased
/// and every character outside `[A-Z0-9]` replaced by `_`.
///
/// # Examples
///
/// ```
/// use autumn::naming::derive_env_name;
///
/// assert_eq!(derive_env_name("server.host"), "CONFIG_SERVER_HOST");
/// assert_eq!(derive_env_name("log-level"), "CONFIG_LOG_LEVEL");
/// ```
#[must_use]
pub fn derive_env_name(key: &str) -> String {
    let mut name = String::with_capacity(ENV_PREFIX.len() + key.len());
    name.push_str(ENV_PREFIX);
    name.extend(key.chars().map(|c| {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() || upper.is_ascii_digit() {
            upper
        } else {
            '_'
        }
    }));
    name
}

/// Check a key against the key syntax.
///
/// Keys are one or more `.`-separated segments, each matching
/// `[a-z][a-z0-9-]*`.
///
/// # Errors
///
/// Returns the reason the key is invalid.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key cannot be empty".into());
    }

    for segment in key.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err("key contains an empty segment".into()),
            Some(first) if !first.is_ascii_lowercase() => {
                return Err(format!(
                    "segment '{segment}' must start with a lowercase letter"
                ));
            }
            Some(_) => {}
        }

        if let Some(bad) =
            chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(format!(
                "segment '{segment}' contains '{bad}' (allowed: a-z, 0-9, -)"
            ));
        }
    }

    Ok(())
}

/// Check an environment variable name override.
///
/// Names must be non-empty, contain only alphanumeric characters and
/// underscores, and start with a letter.
///
/// # Errors
///
/// Returns the reason the name is invalid.
pub fn validate_env_name(name: &str) -> Result<(), String> {
    let Some(first) = name.chars().next() else {
        return Err("environment variable name cannot be empty".into());
    };

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("must contain only alphanumeric characters and underscores".into());
    }

    if !first.is_ascii_alphabetic() {
        return Err("must start with a letter".into());
    }

    Ok(())
}

/// Check a command-line flag name override.
///
/// # Errors
///
/// Returns the reason the name is invalid.
pub fn validate_flag_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("flag name cannot be empty".into());
    }
    if name.starts_with('-') {
        return Err("flag name must not start with '-'".into());
    }
    if name.chars().any(|c| c.is_whitespace() || c == '=') {
        return Err("flag name must not contain whitespace or '='".into());
    }
    Ok(())
}
