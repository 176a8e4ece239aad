//! Integration tests for the reference loader.
//!
//! These tests exercise registry setup, file discovery, the process
//! environment and flag parsing together. Tests that touch process
//! environment variables are marked `#[serial]`.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use autumn::validation::{one_of, port};
use autumn::{
    no_validation, ConfigItem, ConfigValue, Disposition, Error, FileLayers, Handlers,
    ItemManifest, Loader, LoaderOptions, Registry, SourceKind,
};
use serial_test::serial;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

impl EnvGuard {
    fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn server_registry() -> Registry {
    Registry::setup(vec![
        ConfigItem::new("server.host", "localhost", no_validation)
            .with_description("The interface to listen on"),
        ConfigItem::with_validator("server.port", 8080u64, port()),
        ConfigItem::with_validator(
            "log.level",
            "info",
            one_of(["debug", "info", "warn", "error"]),
        ),
        ConfigItem::new("features", Vec::<String>::new(), no_validation),
    ])
    .unwrap()
}

/// Handlers that record everything and apply `disposition` to failures.
fn recording(disposition: Disposition) -> (Handlers, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let fail_log = Arc::clone(&log);
    let warn_log = Arc::clone(&log);
    let handlers = Handlers::new(
        move |err: &Error| {
            fail_log.lock().unwrap().push(format!("fail: {err}"));
            disposition
        },
        move |msg: &str| warn_log.lock().unwrap().push(format!("warn: {msg}")),
    );
    (handlers, log)
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_flag_beats_environment_and_default() {
    let registry = server_registry();
    let flags = registry
        .parse_flags(["--server.port", "9000"])
        .unwrap();
    let env = std::collections::HashMap::from([(
        "CONFIG_SERVER_PORT".to_string(),
        "9100".to_string(),
    )]);

    let config = Loader::new(LoaderOptions::default())
        .with_flags(flags)
        .with_env(env)
        .with_layers(FileLayers::new())
        .load(&registry, &Handlers::strict())
        .unwrap();

    assert_eq!(config.unsigned("server.port").unwrap(), 9000);
    assert_eq!(config.source("server.port"), Some(&SourceKind::Flag));
    assert_eq!(config.string("server.host").unwrap(), "localhost");
    assert_eq!(config.source("server.host"), Some(&SourceKind::Default));
}

#[test]
fn test_all_layers_from_disk() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "config.yaml",
        "server:\n  host: base.example\n  port: 8000\nlog:\n  level: warn\n",
    );
    write_file(dir.path(), "config-base.yml", "server:\n  host: base-profile.example\n");
    write_file(
        dir.path(),
        "config-dev.json",
        r#"{"server": {"host": "dev.example"}, "features": ["a", "b"]}"#,
    );
    write_file(dir.path(), "secrets.yaml", "server.port: 8443\n");

    let options = LoaderOptions::new(dir.path()).with_profiles(["base", "dev"]);
    let (handlers, log) = recording(Disposition::Abort);
    let config = Loader::new(options)
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &handlers)
        .unwrap();

    assert_eq!(config.string("server.host").unwrap(), "dev.example");
    assert_eq!(
        config.source("server.host"),
        Some(&SourceKind::Profile("dev".into()))
    );
    assert_eq!(config.unsigned("server.port").unwrap(), 8443);
    assert_eq!(config.source("server.port"), Some(&SourceKind::Secrets));
    assert_eq!(config.string("log.level").unwrap(), "warn");
    assert_eq!(config.source("log.level"), Some(&SourceKind::Base));
    assert_eq!(config.string_list("features").unwrap(), ["a", "b"]);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_properties_files_resolve_typed_values() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "config.properties",
        "server.host=props.example\nserver.port=8000\nfeatures=a, b\n",
    );
    write_file(dir.path(), "config-prod.properties", "log.level=error\n");
    write_file(dir.path(), "secrets.properties", "server.port=8443\n");

    let options = LoaderOptions::new(dir.path()).with_profiles(["prod"]);
    let (handlers, log) = recording(Disposition::Abort);
    let config = Loader::new(options)
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &handlers)
        .unwrap();

    assert_eq!(config.string("server.host").unwrap(), "props.example");
    assert_eq!(config.unsigned("server.port").unwrap(), 8443);
    assert_eq!(config.source("server.port"), Some(&SourceKind::Secrets));
    assert_eq!(config.string("log.level").unwrap(), "error");
    assert_eq!(config.string_list("features").unwrap(), ["a", "b"]);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_separate_secrets_dir() {
    let config_dir = TempDir::new().unwrap();
    let secrets_dir = TempDir::new().unwrap();
    write_file(config_dir.path(), "config.yaml", "server:\n  port: 8000\n");
    write_file(secrets_dir.path(), "secrets.yaml", "server:\n  port: 8001\n");
    // Ignored: secrets are only read from the secrets directory
    write_file(config_dir.path(), "secrets.yaml", "server:\n  port: 8002\n");

    let options = LoaderOptions::new(config_dir.path()).with_secrets_dir(secrets_dir.path());
    let config = Loader::new(options)
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &Handlers::strict())
        .unwrap();

    assert_eq!(config.unsigned("server.port").unwrap(), 8001);
}

#[test]
fn test_missing_files_warn_but_secrets_are_silent() {
    let dir = TempDir::new().unwrap();
    let options = LoaderOptions::new(dir.path()).with_profiles(["dev"]);
    let (handlers, log) = recording(Disposition::Abort);

    let config = Loader::new(options)
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &handlers)
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2, "unexpected reports: {log:?}");
    assert!(log.iter().all(|entry| entry.starts_with("warn: ")));
    assert!(log[1].contains("'dev'"));
    assert!(config.iter().all(|e| e.source == SourceKind::Default));
}

#[test]
fn test_malformed_file_is_a_fatal_load_error() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "config.yaml", "server: [unclosed\n");

    let result = Loader::new(LoaderOptions::new(dir.path()))
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &Handlers::strict());
    assert!(matches!(result, Err(Error::Source { .. })));

    let (handlers, log) = recording(Disposition::Continue);
    let config = Loader::new(LoaderOptions::new(dir.path()))
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &handlers)
        .unwrap();
    assert_eq!(config.string("server.host").unwrap(), "localhost");
    assert!(log.lock().unwrap()[0].starts_with("fail: "));
}

#[test]
fn test_profile_names_cannot_escape_config_dir() {
    let dir = TempDir::new().unwrap();
    let options = LoaderOptions::new(dir.path()).with_profiles(["../etc"]);
    let result = Loader::new(options)
        .with_env(std::collections::HashMap::new())
        .load(&server_registry(), &Handlers::lenient());
    assert!(matches!(result, Err(Error::InvalidPath { .. })));
}

// ============================================================================
// Process environment
// ============================================================================

#[test]
#[serial]
fn test_process_environment_overrides_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "config.yaml", "server:\n  host: file.example\n");
    let _host = EnvGuard::new("CONFIG_SERVER_HOST", "env.example");
    let _features = EnvGuard::new("CONFIG_FEATURES", "x, y,,z");

    let config = Loader::new(LoaderOptions::new(dir.path()))
        .load(&server_registry(), &Handlers::strict())
        .unwrap();

    assert_eq!(config.string("server.host").unwrap(), "env.example");
    assert_eq!(config.source("server.host"), Some(&SourceKind::Environment));
    assert_eq!(config.string_list("features").unwrap(), ["x", "y", "z"]);
}

#[test]
#[serial]
fn test_empty_environment_value_is_unset() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "config.yaml", "server:\n  host: file.example\n");
    let _host = EnvGuard::new("CONFIG_SERVER_HOST", "");

    let config = Loader::new(LoaderOptions::new(dir.path()))
        .load(&server_registry(), &Handlers::strict())
        .unwrap();

    assert_eq!(config.string("server.host").unwrap(), "file.example");
}

#[test]
#[serial]
fn test_env_name_override() {
    let registry = Registry::setup(vec![
        ConfigItem::new("server.host", "localhost", no_validation).with_env_name("MY_HOST"),
    ])
    .unwrap();
    let _derived = EnvGuard::new("CONFIG_SERVER_HOST", "ignored.example");
    let _custom = EnvGuard::new("MY_HOST", "custom.example");

    let config = Loader::new(LoaderOptions::default())
        .with_layers(FileLayers::new())
        .load(&registry, &Handlers::strict())
        .unwrap();

    assert_eq!(config.string("server.host").unwrap(), "custom.example");
}

// ============================================================================
// Validation and conversion
// ============================================================================

#[test]
fn test_validation_failures_are_aggregated() {
    let layers = FileLayers::new()
        .base_yaml("server:\n  port: 0\nlog:\n  level: trace\n")
        .unwrap();
    let (handlers, log) = recording(Disposition::Abort);

    let result = Loader::new(LoaderOptions::default())
        .with_env(std::collections::HashMap::new())
        .with_layers(layers)
        .load(&server_registry(), &handlers);

    assert!(matches!(result, Err(Error::ValidationFailed { count: 2 })));
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 3);
    assert!(log[0].starts_with("warn: ") && log[0].contains("server.port"));
    assert!(log[1].starts_with("warn: ") && log[1].contains("log.level"));
    assert!(log[2].starts_with("fail: "));
}

#[test]
fn test_invalid_value_falls_through_when_continuing() {
    let layers = FileLayers::new()
        .base_yaml("server:\n  port: 7000\n")
        .unwrap()
        .secrets_yaml("server:\n  port: not-a-number\n")
        .unwrap();

    let strict = Loader::new(LoaderOptions::default())
        .with_env(std::collections::HashMap::new())
        .with_layers(layers.clone())
        .load(&server_registry(), &Handlers::strict());
    assert!(matches!(strict, Err(Error::InvalidValue { .. })));

    let config = Loader::new(LoaderOptions::default())
        .with_env(std::collections::HashMap::new())
        .with_layers(layers)
        .load(&server_registry(), &Handlers::lenient())
        .unwrap();
    assert_eq!(config.get("server.port"), Some(&ConfigValue::Unsigned(7000)));
    assert_eq!(config.source("server.port"), Some(&SourceKind::Base));
}

// ============================================================================
// Manifest
// ============================================================================

#[test]
fn test_manifest_drives_the_loader() {
    let manifest = ItemManifest::from_yaml(
        "\
- key: db.url
  type: string
  validate: non-empty
- key: db.pool-size
  type: unsigned
  default: 4
  flag_name: pool
  validate:
    range: { min: 1, max: 32 }
",
    )
    .unwrap();
    let registry = Registry::setup(manifest.into_items().unwrap()).unwrap();
    let flags = registry.parse_flags(["--pool", "16"]).unwrap();
    let layers = FileLayers::new()
        .secrets_yaml("db:\n  url: postgres://localhost/app\n")
        .unwrap();

    let config = Loader::new(LoaderOptions::default())
        .with_env(std::collections::HashMap::new())
        .with_flags(flags)
        .with_layers(layers)
        .load(&registry, &Handlers::strict())
        .unwrap();

    assert_eq!(config.string("db.url").unwrap(), "postgres://localhost/app");
    assert_eq!(config.unsigned("db.pool-size").unwrap(), 16);
    assert_eq!(
        registry.get("db.pool-size").unwrap().env_name(),
        "CONFIG_DB_POOL_SIZE"
    );
}
