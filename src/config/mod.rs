//! Configuration module for the xbm editor
//!
//! Provides types, discovery and parsing for `xbm.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
