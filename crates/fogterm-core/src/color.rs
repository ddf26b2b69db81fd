//! Terminal colors.

use serde::{Deserialize, Serialize};

/// Opaque 24-bit RGB color.
///
/// The constants mirror the classic 16-color console palette; how they map
/// onto a real terminal is decided by the terminal backend's color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorParseError::InvalidHex)
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Convert to a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Dark blue
    pub const DARK_BLUE: Self = Self::rgb(0, 0, 128);
    /// Dark green
    pub const DARK_GREEN: Self = Self::rgb(0, 128, 0);
    /// Dark cyan
    pub const DARK_CYAN: Self = Self::rgb(0, 128, 128);
    /// Dark red
    pub const DARK_RED: Self = Self::rgb(128, 0, 0);
    /// Dark magenta
    pub const DARK_MAGENTA: Self = Self::rgb(128, 0, 128);
    /// Dark yellow
    pub const DARK_YELLOW: Self = Self::rgb(128, 128, 0);
    /// Gray, the default foreground
    pub const GRAY: Self = Self::rgb(192, 192, 192);
    /// Dark gray
    pub const DARK_GRAY: Self = Self::rgb(128, 128, 128);
    /// Blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Green
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Cyan
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Magenta
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    /// Yellow
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// White
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Default foreground of a control nobody themed.
    pub const DEFAULT_FORE: Self = Self::GRAY;
    /// Default background of a control nobody themed.
    pub const DEFAULT_BACK: Self = Self::BLACK;
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 6)")]
    InvalidLength,
}
