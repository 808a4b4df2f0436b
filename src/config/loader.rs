//! Configuration loading and discovery for `xbm.toml`
//!
//! Provides functions to find, load, and merge configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::XbmConfig;

/// File name looked up in the working directory and its ancestors.
pub const CONFIG_FILE: &str = "xbm.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse xbm.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub entries_per_line: Option<usize>,
    pub no_header: bool,
    pub scale: Option<u8>,
    pub frame_duration_ms: Option<u32>,
    pub on_color: Option<String>,
    pub off_color: Option<String>,
}

/// Find xbm.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for xbm.toml
/// 2. Check XDG_CONFIG_HOME/xbm-editor/xbm.toml (or ~/.config/xbm-editor/xbm.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Find xbm.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("xbm-editor").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find xbm.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one the file is discovered with
/// [`find_config`], and when nothing is found the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<XbmConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("using config {}", p.display());
            load_config_file(&p)
        }
        None => Ok(XbmConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<XbmConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: XbmConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut XbmConfig, overrides: &CliOverrides) {
    if let Some(entries) = overrides.entries_per_line {
        config.export.entries_per_line = entries;
    }
    if overrides.no_header {
        config.export.header_enabled = false;
    }
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(duration) = overrides.frame_duration_ms {
        config.render.frame_duration_ms = duration;
    }
    if let Some(ref color) = overrides.on_color {
        config.render.on_color = color.clone();
    }
    if let Some(ref color) = overrides.off_color {
        config.render.off_color = color.clone();
    }
}
