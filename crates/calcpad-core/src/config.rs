//! Keypad configuration: canvas size, animation rates and palette.

use kurbo::Size;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Width of the virtual canvas the keypad is authored at.
pub const VIRTUAL_WIDTH: f64 = 750.0;
/// Height of the virtual canvas the keypad is authored at.
pub const VIRTUAL_HEIGHT: f64 = 1200.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors used when producing draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Key fill when the pointer is elsewhere.
    pub idle: Rgba8,
    /// Key fill while hovered.
    pub hovered: Rgba8,
    /// Key fill while the key is pinned active.
    pub active: Rgba8,
    /// Hover highlight drawn over the key fill.
    pub highlight: Rgba8,
    /// Label text.
    pub label: Rgba8,
    /// Translucent panel behind the keys.
    pub panel: Rgba8,
    /// Virtual canvas backdrop.
    pub canvas: Rgba8,
    /// Letterbox bars outside the virtual canvas.
    pub background: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle: Rgba8::new(245, 245, 245, 128),
            hovered: Rgba8::new(255, 255, 255, 255),
            active: Rgba8::new(255, 223, 0, 255),
            highlight: Rgba8::new(255, 255, 255, 255),
            label: Rgba8::new(51, 51, 51, 255),
            panel: Rgba8::new(245, 245, 245, 115),
            canvas: Rgba8::new(92, 108, 168, 255),
            background: Rgba8::new(255, 255, 255, 255),
        }
    }
}

/// Keypad configuration, passed to the keypad at construction.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeypadConfig {
    /// Size of the virtual canvas in virtual units.
    pub virtual_size: Size,
    /// Page transition width rate `K` (units per second). Keys move
    /// horizontally at half this rate so they collapse toward their center.
    pub transition_rate: f64,
    /// Hover highlight growth rate `R` (units per second).
    pub highlight_rate: f64,
    /// Inset applied on every side of a pressed key.
    pub press_inset: f64,
    /// Label size multiplier for a pressed key.
    pub press_label_scale: f64,
    /// Upper bound on the frame delta fed to animations (seconds).
    pub max_frame_time: f64,
    /// Colors for draw commands.
    pub palette: Palette,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            virtual_size: Size::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT),
            transition_rate: 1500.0,
            highlight_rate: 600.0,
            press_inset: 6.0,
            press_label_scale: 0.9,
            max_frame_time: 0.1,
            palette: Palette::default(),
        }
    }
}

impl KeypadConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded keypad config from {}", path.display());
        Ok(config)
    }

    /// Check that sizes and rates are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        };

        positive("virtual_size.width", self.virtual_size.width)?;
        positive("virtual_size.height", self.virtual_size.height)?;
        positive("transition_rate", self.transition_rate)?;
        positive("highlight_rate", self.highlight_rate)?;
        positive("max_frame_time", self.max_frame_time)?;

        if !(self.press_inset.is_finite() && self.press_inset >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "press_inset must be non-negative, got {}",
                self.press_inset
            )));
        }
        if !(self.press_label_scale > 0.0 && self.press_label_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "press_label_scale must be in (0, 1], got {}",
                self.press_label_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = KeypadConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.virtual_size.width - 750.0).abs() < f64::EPSILON);
        assert!((config.virtual_size.height - 1200.0).abs() < f64::EPSILON);
        assert!((config.transition_rate - 1500.0).abs() < f64::EPSILON);
        assert_eq!(config.palette.hovered, Rgba8::new(255, 255, 255, 255));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = KeypadConfig::from_json(r#"{ "transition_rate": 900.0 }"#).unwrap();
        assert!((config.transition_rate - 900.0).abs() < f64::EPSILON);
        assert!((config.highlight_rate - KeypadConfig::default().highlight_rate).abs() < f64::EPSILON);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = KeypadConfig::default();
        config.palette.active = Rgba8::new(1, 2, 3, 4);
        let json = config.to_json().unwrap();
        let back = KeypadConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let result = KeypadConfig::from_json(r#"{ "virtual_size": { "width": 0.0, "height": 100.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_label_scale() {
        let result = KeypadConfig::from_json(r#"{ "press_label_scale": 1.5 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = KeypadConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keypad.json");
        std::fs::write(&path, r#"{ "highlight_rate": 250.0 }"#).unwrap();

        let config = KeypadConfig::load(&path).unwrap();
        assert!((config.highlight_rate - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = KeypadConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = Rgba8::new(255, 223, 0, 255).into();
        let back = Rgba8::from(color);
        assert_eq!(back, Rgba8::new(255, 223, 0, 255));
    }
}
