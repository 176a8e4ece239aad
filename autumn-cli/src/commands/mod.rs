//! CLI command implementations.
//!
//! - `describe`: List the items a manifest declares
//! - `validate`: Check a manifest and its item declarations
//! - `resolve`: Load every item from flags, environment and files
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod describe;
pub mod resolve;
pub mod validate;

pub use completions::CompletionsCommand;
pub use describe::{DescribeCommand, DescribeFormat};
pub use resolve::{ResolveCommand, ResolveFormat};
pub use validate::ValidateCommand;
