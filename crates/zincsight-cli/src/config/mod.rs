//! Layered CLI configuration: built-in defaults, an optional TOML file, `--set` values
//! and explicit flags, in increasing order of precedence.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{ConfigOverrides, build_config};
pub use models::AppConfig;
