//! Horizontal progress bar.

use fogterm_core::{ControlError, DrawContext, Surface, Widget};
use std::any::Any;
use std::io;

/// `[|||||     ]` style bar showing a value from 0 to 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    value: u8,
    bar_char: char,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    /// Width used when the control does not declare one.
    pub const DEFAULT_WIDTH: u16 = 22;

    /// Empty bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 0,
            bar_char: '|',
        }
    }

    /// Set the fill character.
    #[must_use]
    pub const fn with_bar_char(mut self, bar_char: char) -> Self {
        self.bar_char = bar_char;
        self
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Fill character.
    #[must_use]
    pub const fn bar_char(&self) -> char {
        self.bar_char
    }

    /// Set the value. Returns `true` if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ValueOutOfRange`] outside 0..=100; the old
    /// value is kept.
    pub fn set_value(&mut self, value: i32) -> Result<bool, ControlError> {
        let value = u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or(ControlError::ValueOutOfRange {
                field: "value",
                value: i64::from(value),
                min: 0,
                max: 100,
            })?;
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    /// Change the fill character. Returns `true` if it changed.
    pub fn set_bar_char(&mut self, bar_char: char) -> bool {
        let changed = self.bar_char != bar_char;
        self.bar_char = bar_char;
        changed
    }

    fn render(&self, width: u16) -> String {
        let inner = usize::from(width.saturating_sub(2));
        let filled = inner * usize::from(self.value) / 100;
        format!(
            "[{}{}]",
            self.bar_char.to_string().repeat(filled),
            " ".repeat(inner - filled)
        )
    }
}

impl Widget for ProgressBar {
    fn type_name(&self) -> &'static str {
        "ProgressBar"
    }

    fn fixed_height(&self) -> Option<u16> {
        Some(1)
    }

    fn natural_width(&self) -> u16 {
        Self::DEFAULT_WIDTH
    }

    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()> {
        ctx.write(surface, 0, &self.render(ctx.boundary.width), ctx.fore, ctx.back)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range() {
        let mut bar = ProgressBar::new();
        assert_eq!(bar.set_value(50), Ok(true));
        assert_eq!(bar.set_value(50), Ok(false));
        assert_eq!(bar.set_value(100), Ok(true));
        assert!(matches!(
            bar.set_value(101),
            Err(ControlError::ValueOutOfRange { value: 101, .. })
        ));
        assert!(bar.set_value(-1).is_err());
        assert_eq!(bar.value(), 100);
    }

    #[test]
    fn test_render_proportional() {
        let mut bar = ProgressBar::new();
        assert_eq!(bar.render(12), "[          ]");
        bar.set_value(50).unwrap();
        assert_eq!(bar.render(12), "[|||||     ]");
        bar.set_value(100).unwrap();
        assert_eq!(bar.render(12), "[||||||||||]");
    }

    #[test]
    fn test_custom_bar_char_and_tiny_width() {
        let mut bar = ProgressBar::new().with_bar_char('#');
        bar.set_value(30).unwrap();
        assert_eq!(bar.render(12), "[###       ]");
        assert_eq!(bar.render(1), "[]");
        assert!(bar.set_bar_char('='));
        assert!(!bar.set_bar_char('='));
    }
}
