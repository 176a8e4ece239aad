#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # autumn
//!
//! Typed configuration item descriptors with a layered reference loader.
//!
//! Each [`ConfigItem`] declares a key, a typed default, a validator and the
//! names it answers to on the command line and in the environment. A
//! [`Registry`] checks a set of items once at startup, and a [`Loader`]
//! resolves every item against flags, environment variables and YAML or
//! JSON files, highest precedence first.
//!
//! ## Core Types
//!
//! - [`ConfigItem`] and [`ConfigValue`]: Item descriptors and their typed values
//! - [`Registry`]: A checked, ordered set of items
//! - [`Loader`] and [`ResolvedConfig`]: Layered resolution and its result
//! - [`Handlers`]: Where configuration failures and warnings are reported
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use autumn::{no_validation, validation, ConfigItem, FileLayers, Handlers, Loader};
//! use autumn::{LoaderOptions, Registry};
//! use std::collections::HashMap;
//!
//! let registry = Registry::setup(vec![
//!     ConfigItem::new("server.host", "localhost", no_validation)
//!         .with_description("The interface to listen on"),
//!     ConfigItem::with_validator("server.port", 8080u64, validation::port()),
//! ])
//! .unwrap();
//!
//! let env = HashMap::from([("CONFIG_SERVER_PORT".to_string(), "9090".to_string())]);
//! let layers = FileLayers::new().base_yaml("server:\n  host: example.org\n").unwrap();
//!
//! let config = Loader::new(LoaderOptions::default())
//!     .with_env(env)
//!     .with_layers(layers)
//!     .load(&registry, &Handlers::strict())
//!     .unwrap();
//!
//! assert_eq!(config.string("server.host").unwrap(), "example.org");
//! assert_eq!(config.unsigned("server.port").unwrap(), 9090);
//! ```

pub mod error;
pub mod handlers;
pub mod item;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod registry;
pub mod resolved;
pub mod resolver;
pub mod source;
pub mod validation;
pub mod value;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use handlers::{Disposition, FailFunc, Handlers, WarnFunc};
pub use item::ConfigItem;
pub use logging::{init_logger, LogLevel, Logger};
pub use manifest::{ItemManifest, ManifestEntry, NamedValidator, RangeSpec, ValidatorSpec};
pub use registry::{FlagValues, Registry};
pub use resolved::{ResolvedConfig, ResolvedEntry};
pub use resolver::{Loader, LoaderOptions};
pub use source::{EnvSource, FileLayers, Layer, ProcessEnv, SourceKind};
pub use validation::{no_validation, Validate, ValidationError, Validator};
pub use value::{ConfigValue, ValueKind};
