//! Helpers shared by the single-line text widgets.

use fogterm_core::ControlError;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Horizontal placement of text inside a wider boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush left, padded on the right
    #[default]
    Left,
    /// Centered, odd leftover cell goes to the right
    Center,
    /// Flush right, padded on the left
    Right,
}

/// Reject text containing line feeds or carriage returns.
///
/// # Errors
///
/// Returns [`ControlError::MultilineText`].
pub fn single_line(text: impl Into<String>) -> Result<String, ControlError> {
    let text = text.into();
    if text.contains(['\n', '\r']) {
        return Err(ControlError::MultilineText);
    }
    Ok(text)
}

/// Display width of `text`, saturated to a cell coordinate.
#[must_use]
pub fn cell_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

/// Truncate `text` to at most `width` cells.
#[must_use]
pub fn truncate(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..index];
        }
        used += w;
    }
    text
}

/// Pad or truncate `text` to exactly `width` cells.
#[must_use]
pub fn fit(text: &str, width: usize, alignment: Alignment) -> String {
    let text = truncate(text, width);
    let gap = width.saturating_sub(text.width());
    let (before, after) = match alignment {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };
    format!("{}{text}{}", " ".repeat(before), " ".repeat(after))
}
