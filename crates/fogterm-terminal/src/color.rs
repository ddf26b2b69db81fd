//! Color mode detection and conversion for terminals.

use crossterm::style::Color as CrosstermColor;
use fogterm_core::Color;
use serde::{Deserialize, Serialize};

/// Terminal color capability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 24-bit true color (COLORTERM=truecolor or 24bit).
    #[default]
    TrueColor,
    /// 256 color palette.
    Color256,
    /// 16 ANSI colors.
    Color16,
    /// Monochrome (no color).
    Mono,
}

impl ColorMode {
    /// Auto-detect terminal color capabilities.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Detect color mode from environment variable values.
    #[must_use]
    pub fn detect_with_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }

        match term {
            Some(t) if t.contains("256color") => Self::Color256,
            Some(t) if t.contains("color") || t.contains("xterm") => Self::Color16,
            Some("dumb") | None => Self::Mono,
            _ => Self::Color16,
        }
    }

    /// Convert a fogterm color to a crossterm color for this mode.
    ///
    /// In [`ColorMode::Mono`] foreground and background collapse onto the
    /// terminal defaults.
    #[must_use]
    pub fn to_crossterm(self, color: Color) -> CrosstermColor {
        let Color { r, g, b } = color;
        match self {
            Self::TrueColor => CrosstermColor::Rgb { r, g, b },
            Self::Color256 => CrosstermColor::AnsiValue(rgb_to_256(r, g, b)),
            Self::Color16 => rgb_to_16(r, g, b),
            Self::Mono => CrosstermColor::Reset,
        }
    }
}

/// Convert RGB to a 256-color palette index.
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        // grayscale ramp 232..=255
        return 232 + ((r - 8) / 10).min(23);
    }

    // 6x6x6 cube 16..=231
    let r_idx = (u16::from(r) * 5 / 255) as u8;
    let g_idx = (u16::from(g) * 5 / 255) as u8;
    let b_idx = (u16::from(b) * 5 / 255) as u8;
    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert RGB to the nearest of the 16 ANSI colors.
fn rgb_to_16(r: u8, g: u8, b: u8) -> CrosstermColor {
    let max = r.max(g).max(b);
    let threshold = max / 2;
    let bright = max > 160;

    let has_r = r > threshold;
    let has_g = g > threshold;
    let has_b = b > threshold;

    match (has_r, has_g, has_b, bright) {
        (false, false, false, _) => CrosstermColor::Black,
        (true, false, false, false) => CrosstermColor::DarkRed,
        (true, false, false, true) => CrosstermColor::Red,
        (false, true, false, false) => CrosstermColor::DarkGreen,
        (false, true, false, true) => CrosstermColor::Green,
        (true, true, false, false) => CrosstermColor::DarkYellow,
        (true, true, false, true) => CrosstermColor::Yellow,
        (false, false, true, false) => CrosstermColor::DarkBlue,
        (false, false, true, true) => CrosstermColor::Blue,
        (true, false, true, false) => CrosstermColor::DarkMagenta,
        (true, false, true, true) => CrosstermColor::Magenta,
        (false, true, true, false) => CrosstermColor::DarkCyan,
        (false, true, true, true) => CrosstermColor::Cyan,
        (true, true, true, false) => CrosstermColor::DarkGrey,
        (true, true, true, true) if max < 224 => CrosstermColor::Grey,
        (true, true, true, true) => CrosstermColor::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_default() {
        assert_eq!(ColorMode::default(), ColorMode::TrueColor);
    }

    #[test]
    fn test_detect_colorterm_truecolor() {
        assert_eq!(
            ColorMode::detect_with_env(Some("truecolor"), Some("dumb")),
            ColorMode::TrueColor
        );
        assert_eq!(ColorMode::detect_with_env(Some("24bit"), None), ColorMode::TrueColor);
    }

    #[test]
    fn test_detect_falls_through_to_term() {
        assert_eq!(
            ColorMode::detect_with_env(Some("other"), Some("xterm-256color")),
            ColorMode::Color256
        );
        assert_eq!(ColorMode::detect_with_env(None, Some("xterm")), ColorMode::Color16);
        assert_eq!(ColorMode::detect_with_env(None, Some("linux-color")), ColorMode::Color16);
        assert_eq!(ColorMode::detect_with_env(None, Some("screen")), ColorMode::Color16);
    }

    #[test]
    fn test_detect_dumb_and_missing() {
        assert_eq!(ColorMode::detect_with_env(None, Some("dumb")), ColorMode::Mono);
        assert_eq!(ColorMode::detect_with_env(None, None), ColorMode::Mono);
        assert_eq!(ColorMode::detect_with_env(Some(""), None), ColorMode::Mono);
    }

    #[test]
    fn test_truecolor_passthrough() {
        let c = ColorMode::TrueColor.to_crossterm(Color::rgb(10, 20, 30));
        assert_eq!(c, CrosstermColor::Rgb { r: 10, g: 20, b: 30 });
    }

    #[test]
    fn test_256_grayscale_and_cube() {
        assert_eq!(rgb_to_256(0, 0, 0), 16);
        assert_eq!(rgb_to_256(255, 255, 255), 231);
        assert_eq!(rgb_to_256(128, 128, 128), 244);
        assert_eq!(rgb_to_256(255, 0, 0), 196);
        assert_eq!(rgb_to_256(0, 0, 255), 21);
    }

    #[test]
    fn test_16_console_palette() {
        let mode = ColorMode::Color16;
        assert_eq!(mode.to_crossterm(Color::BLACK), CrosstermColor::Black);
        assert_eq!(mode.to_crossterm(Color::DARK_BLUE), CrosstermColor::DarkBlue);
        assert_eq!(mode.to_crossterm(Color::DARK_RED), CrosstermColor::DarkRed);
        assert_eq!(mode.to_crossterm(Color::DARK_GRAY), CrosstermColor::DarkGrey);
        assert_eq!(mode.to_crossterm(Color::GRAY), CrosstermColor::Grey);
        assert_eq!(mode.to_crossterm(Color::WHITE), CrosstermColor::White);
        assert_eq!(mode.to_crossterm(Color::YELLOW), CrosstermColor::Yellow);
        assert_eq!(mode.to_crossterm(Color::CYAN), CrosstermColor::Cyan);
    }

    #[test]
    fn test_mono_uses_terminal_defaults() {
        assert_eq!(ColorMode::Mono.to_crossterm(Color::RED), CrosstermColor::Reset);
    }

    #[test]
    fn test_color_mode_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ColorMode,
        }
        let w: Wrapper = toml::from_str("mode = \"color256\"").unwrap();
        assert_eq!(w.mode, ColorMode::Color256);
    }
}
