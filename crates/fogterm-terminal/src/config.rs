//! Application configuration.

use crate::color::ColorMode;
use crate::error::TuiError;
use crate::input::KeyBinding;
use fogterm_core::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```
/// use fogterm_terminal::AppConfig;
///
/// let config = AppConfig::from_toml_str("debug = true\nquit_key = \"esc\"").unwrap();
/// assert!(config.debug);
/// assert_eq!(config.poll_interval_ms, 75);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interval between input polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Columns used when the terminal size cannot be queried.
    pub fallback_width: u16,
    /// Rows used when the terminal size cannot be queried.
    pub fallback_height: u16,
    /// Cycle panel colors, label panels and show key/focus status lines.
    pub debug: bool,
    /// Color mode (auto-detected if not specified).
    pub color_mode: Option<ColorMode>,
    /// Key that ends the run loop.
    pub quit_key: KeyBinding,
    /// Capacity of the queue between the input thread and the loop.
    pub input_queue: usize,
    /// Foreground color applied to the root's inheriting subtree.
    pub fore_color: Color,
    /// Background color applied to the root's inheriting subtree.
    pub back_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 75,
            fallback_width: 80,
            fallback_height: 25,
            debug: false,
            color_mode: None,
            quit_key: KeyBinding::default(),
            input_queue: 64,
            fore_color: Color::DEFAULT_FORE,
            back_color: Color::DEFAULT_BACK,
        }
    }
}

impl AppConfig {
    /// Create a responsive config (fast polling).
    #[must_use]
    pub fn responsive() -> Self {
        Self {
            poll_interval_ms: 16,
            ..Default::default()
        }
    }

    /// Create a power-saving config (slow polling, short queue).
    #[must_use]
    pub fn power_saving() -> Self {
        Self {
            poll_interval_ms: 200,
            input_queue: 16,
            ..Default::default()
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::Config`] for malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self, TuiError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::Io`] if the file cannot be read and
    /// [`TuiError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuiError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Poll interval as a duration.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Terminal extent to use when the size query fails.
    #[must_use]
    pub const fn fallback_size(&self) -> (u16, u16) {
        (self.fallback_width, self.fallback_height)
    }

    /// Configured color mode, or the one detected from the environment.
    #[must_use]
    pub fn resolved_color_mode(&self) -> ColorMode {
        self.color_mode.unwrap_or_else(ColorMode::detect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogterm_core::{Key, KeyModifiers};

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(75));
        assert_eq!(config.fallback_size(), (80, 25));
        assert!(!config.debug);
        assert!(config.color_mode.is_none());
        assert_eq!(config.quit_key.key, Key::Char('c'));
        assert_eq!(config.quit_key.modifiers, KeyModifiers::CONTROL);
        assert_eq!(config.input_queue, 64);
    }

    #[test]
    fn test_config_presets() {
        assert!(AppConfig::responsive().poll_interval_ms < AppConfig::default().poll_interval_ms);
        let saving = AppConfig::power_saving();
        assert!(saving.poll_interval_ms > AppConfig::default().poll_interval_ms);
        assert_eq!(saving.fallback_size(), (80, 25));
    }

    #[test]
    fn test_config_from_toml() {
        let text = r##"
            poll_interval_ms = 50
            fallback_width = 100
            color_mode = "color16"
            quit_key = "ctrl+q"
            back_color = "#000080"
        "##;
        let config = AppConfig::from_toml_str(text).unwrap();
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.fallback_size(), (100, 25));
        assert_eq!(config.color_mode, Some(ColorMode::Color16));
        assert_eq!(config.resolved_color_mode(), ColorMode::Color16);
        assert_eq!(config.quit_key.key, Key::Char('q'));
        assert_eq!(config.back_color, Color::DARK_BLUE);
        assert_eq!(config.fore_color, Color::DEFAULT_FORE);
    }

    #[test]
    fn test_config_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_toml_str("quit_key = \"hyper+x\""),
            Err(TuiError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("back_color = \"blue\""),
            Err(TuiError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("fallback_width = -1"),
            Err(TuiError::Config(_))
        ));
    }

    #[test]
    fn test_config_roundtrip_through_toml() {
        let config = AppConfig {
            debug: true,
            color_mode: Some(ColorMode::Mono),
            ..AppConfig::power_saving()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = AppConfig::load("/nonexistent/fogterm.toml").unwrap_err();
        assert!(matches!(err, TuiError::Io(_)));
    }
}
