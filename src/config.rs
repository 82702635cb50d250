//! TOML-based configuration for viewport and layout geometry.
//!
//! Defaults match the original hardcoded values (800×600 canvas, 15/18
//! pixel steps, 100 pixel scroll, 12 pixel base font). Every struct
//! implements `Default` so a missing or partial document produces the same
//! behavior as the constants it replaced.
//!
//! The CLI binaries never read a config file (they take a URL and nothing
//! else); this object exists so embedders inject geometry into the layout
//! and viewport components instead of reading ambient globals.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Config structs
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub scroll: ScrollConfig,
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

/// Text-flow geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal margin and x-cursor reset position.
    pub hstep: f32,
    /// Initial y-cursor and extra paragraph gap after `</p>`.
    pub vstep: f32,
    /// Font size at the start of the token stream, in pixels.
    pub base_font_size: i32,
    /// Baseline/descent multiplier applied to the tallest font of a line.
    pub leading: f32,
}

/// Vertical scrolling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels advanced by one "scroll down" input event.
    pub step: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Default impls — match original hardcoded values exactly
// ─────────────────────────────────────────────────────────────────────────────

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hstep: 15.0,
            vstep: 18.0,
            base_font_size: 12,
            leading: 1.25,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { step: 100.0 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Parses a TOML document, falling back to defaults for anything the
    /// document does not mention. Never panics — an unparsable document
    /// yields the defaults.
    pub fn from_toml_str(content: &str) -> Self {
        match toml::from_str::<Config>(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid config document, using defaults");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_original_values() {
        let c = Config::default();
        assert_eq!(c.window.width, 800);
        assert_eq!(c.window.height, 600);
        assert_eq!(c.layout.hstep, 15.0);
        assert_eq!(c.layout.vstep, 18.0);
        assert_eq!(c.layout.base_font_size, 12);
        assert_eq!(c.layout.leading, 1.25);
        assert_eq!(c.scroll.step, 100.0);
    }

    #[test]
    fn test_empty_toml_returns_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.scroll.step, 100.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
[window]
width = 1024
"#;
        let config = Config::from_toml_str(toml);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600); // default
        assert_eq!(config.layout.hstep, 15.0); // default
    }

    #[test]
    fn test_invalid_toml_returns_defaults() {
        let config = Config::from_toml_str("ceci n'est pas du toml ===");
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.window.width, config.window.width);
        assert_eq!(deserialized.layout.vstep, config.layout.vstep);
        assert_eq!(deserialized.scroll.step, config.scroll.step);
    }
}
