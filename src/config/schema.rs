//! Configuration schema types for `xbm.toml`
//!
//! Every section and field is optional; missing values fall back to the
//! editor defaults (8x8 "untitled" sprites, 8 bytes per exported line).

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_ENTRIES_PER_LINE;
use crate::color::parse_color;
use crate::renderer::Palette;

/// C export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Byte entries per line of a data block
    #[serde(default = "default_entries_per_line")]
    pub entries_per_line: usize,
    /// Lines of the block comment placed above exported sheets
    #[serde(default)]
    pub header: Vec<String>,
    /// Emit the header comment at all
    #[serde(default = "default_true")]
    pub header_enabled: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            entries_per_line: default_entries_per_line(),
            header: Vec::new(),
            header_enabled: true,
        }
    }
}

impl ExportConfig {
    /// Header lines to emit, empty when disabled.
    pub fn effective_header(&self) -> &[String] {
        if self.header_enabled {
            &self.header
        } else {
            &[]
        }
    }
}

fn default_entries_per_line() -> usize {
    DEFAULT_ENTRIES_PER_LINE
}

fn default_true() -> bool {
    true
}

/// Settings for newly created sprites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { width: default_dimension(), height: default_dimension(), name: default_name() }
    }
}

fn default_dimension() -> u32 {
    8
}

fn default_name() -> String {
    "untitled".to_string()
}

/// PNG / GIF / terminal rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Integer upscaling factor (1-16)
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Delay between GIF frames
    #[serde(default = "default_frame_duration")]
    pub frame_duration_ms: u32,
    /// Color of set pixels
    #[serde(default = "default_on_color")]
    pub on_color: String,
    /// Color of clear pixels
    #[serde(default = "default_off_color")]
    pub off_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            frame_duration_ms: default_frame_duration(),
            on_color: default_on_color(),
            off_color: default_off_color(),
        }
    }
}

impl RenderConfig {
    /// The configured colors, falling back to black on white for anything
    /// that does not parse. `validate` reports those cases.
    pub fn palette(&self) -> Palette {
        let fallback = Palette::default();
        Palette {
            on: parse_color(&self.on_color).unwrap_or(fallback.on),
            off: parse_color(&self.off_color).unwrap_or(fallback.off),
        }
    }
}

fn default_scale() -> u8 {
    1
}

fn default_frame_duration() -> u32 {
    150
}

fn default_on_color() -> String {
    "#000000".to_string()
}

fn default_off_color() -> String {
    "#FFFFFF".to_string()
}

/// Complete xbm.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XbmConfig {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "xbm.toml: '{}' {}", self.field, self.message)
    }
}

impl XbmConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut error = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message })
        };

        if self.export.entries_per_line == 0 {
            error("export.entries_per_line", "must be a positive integer".to_string());
        }
        if self.defaults.width == 0 {
            error("defaults.width", "must be a positive integer".to_string());
        }
        if self.defaults.height == 0 {
            error("defaults.height", "must be a positive integer".to_string());
        }
        if self.defaults.name.trim().is_empty() {
            error("defaults.name", "must be a non-empty string".to_string());
        }
        if !(1..=16).contains(&self.render.scale) {
            error("render.scale", "must be between 1 and 16".to_string());
        }
        if self.render.frame_duration_ms == 0 {
            error("render.frame_duration_ms", "must be a positive integer".to_string());
        }
        if let Err(e) = parse_color(&self.render.on_color) {
            error("render.on_color", e.to_string());
        }
        if let Err(e) = parse_color(&self.render.off_color) {
            error("render.off_color", e.to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
