//! Static text.

use crate::text::{cell_width, fit, single_line, Alignment};
use fogterm_core::{ControlError, DrawContext, Surface, Widget};
use std::any::Any;
use std::io;

/// Single-line text, one row high.
///
/// With an auto width (0) the control is exactly as wide as the text;
/// otherwise the text is aligned inside the boundary and truncated if it
/// does not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
    alignment: Alignment,
}

impl Label {
    /// Create a left-aligned label.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::MultilineText`] if `text` has a line break.
    pub fn new(text: impl Into<String>) -> Result<Self, ControlError> {
        Ok(Self {
            text: single_line(text)?,
            alignment: Alignment::Left,
        })
    }

    /// Set the alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Get the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the alignment.
    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Replace the text. Returns `true` if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::MultilineText`] if `text` has a line break.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<bool, ControlError> {
        let text = single_line(text)?;
        if text == self.text {
            return Ok(false);
        }
        self.text = text;
        Ok(true)
    }

    /// Change the alignment. Returns `true` if it changed.
    pub fn set_alignment(&mut self, alignment: Alignment) -> bool {
        let changed = self.alignment != alignment;
        self.alignment = alignment;
        changed
    }
}

impl Widget for Label {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn fixed_height(&self) -> Option<u16> {
        Some(1)
    }

    fn natural_width(&self) -> u16 {
        cell_width(&self.text)
    }

    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()> {
        let line = fit(&self.text, usize::from(ctx.boundary.width), self.alignment);
        ctx.write(surface, 0, &line, ctx.fore, ctx.back)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
