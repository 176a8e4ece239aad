//! Property-based tests for naming and resolution.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::handlers::Handlers;
use crate::item::ConfigItem;
use crate::naming::{derive_env_name, validate_env_name, validate_key, ENV_PREFIX};
use crate::registry::{FlagValues, Registry};
use crate::resolver::{Loader, LoaderOptions};
use crate::source::{FileLayers, SourceKind};
use crate::validation::no_validation;
use crate::value::ConfigValue;

// Strategy for generating well-formed keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..4).prop_map(|segments| segments.join("."))
}

fn load_port(
    default: u64,
    flag: Option<u64>,
    env: Option<u64>,
    base: Option<u64>,
) -> (ConfigValue, SourceKind) {
    let registry =
        Registry::setup(vec![ConfigItem::new("server.port", default, no_validation)]).unwrap();

    let flags = FlagValues::from_pairs(flag.map(|v| ("server.port", v.to_string())));
    let env: HashMap<String, String> = env
        .map(|v| ("CONFIG_SERVER_PORT".to_string(), v.to_string()))
        .into_iter()
        .collect();
    let mut layers = FileLayers::new();
    if let Some(v) = base {
        layers = layers
            .base_yaml(&format!("server:\n  port: {v}\n"))
            .unwrap();
    }

    let config = Loader::new(LoaderOptions::default())
        .with_flags(flags)
        .with_env(env)
        .with_layers(layers)
        .load(&registry, &Handlers::strict())
        .unwrap();
    let entry = config.entry("server.port").unwrap();
    (entry.value.clone(), entry.source.clone())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Derived names are always valid environment variable names
    #[test]
    fn derived_env_names_are_well_formed(key in key_strategy()) {
        prop_assert!(validate_key(&key).is_ok());

        let name = derive_env_name(&key);
        prop_assert!(name.starts_with(ENV_PREFIX));
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(validate_env_name(&name).is_ok());
    }

    // Every key separator survives derivation
    #[test]
    fn derived_env_names_keep_segments(key in key_strategy()) {
        let name = derive_env_name(&key);
        let segments = key.split('.').count();
        let underscores_from_dots = name[ENV_PREFIX.len()..]
            .chars()
            .filter(|&c| c == '_')
            .count();
        prop_assert!(underscores_from_dots >= segments - 1);
    }

    // The highest-precedence source that supplies a value wins
    #[test]
    fn highest_precedence_source_wins(
        default in any::<u64>(),
        flag in prop::option::of(any::<u64>()),
        env in prop::option::of(any::<u64>()),
        base in prop::option::of(0u64..=u64::from(u32::MAX)),
    ) {
        let (value, source) = load_port(default, flag, env, base);

        let expected = flag
            .map(|v| (v, SourceKind::Flag))
            .or_else(|| env.map(|v| (v, SourceKind::Environment)))
            .or_else(|| base.map(|v| (v, SourceKind::Base)))
            .unwrap_or((default, SourceKind::Default));

        prop_assert_eq!(value, ConfigValue::Unsigned(expected.0));
        prop_assert_eq!(source, expected.1);
    }

    // With no sources every item resolves to its declared default
    #[test]
    fn defaults_round_trip(
        key in key_strategy(),
        text in "[a-zA-Z0-9 ]{0,20}",
        number in any::<i64>(),
        flag in any::<bool>(),
    ) {
        let registry = Registry::setup(vec![
            ConfigItem::new(format!("{key}.text"), text.as_str(), no_validation),
            ConfigItem::new(format!("{key}.number"), number, no_validation),
            ConfigItem::new(format!("{key}.flag"), flag, no_validation),
        ])
        .unwrap();

        let config = Loader::new(LoaderOptions::default())
            .with_env(HashMap::new())
            .with_layers(FileLayers::new())
            .load(&registry, &Handlers::strict())
            .unwrap();

        for item in &registry {
            let entry = config.entry(item.key()).unwrap();
            prop_assert_eq!(&entry.value, item.default());
            prop_assert_eq!(&entry.source, &SourceKind::Default);
        }
    }
}
