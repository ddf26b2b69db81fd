//! Push button.

use crate::text::{cell_width, single_line};
use fogterm_core::{
    ControlError, DrawContext, InputHandler, Key, KeyInfo, KeyOutcome, Surface, Widget,
};
use std::any::Any;
use std::fmt;
use std::io;

type PressHandler = Box<dyn FnMut() + Send>;

/// Focusable `[ text ]` button.
///
/// Space or Enter presses it. While focused it draws with fore and back
/// colors swapped.
pub struct Button {
    text: String,
    presses: u64,
    on_press: Option<PressHandler>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("presses", &self.presses)
            .field("on_press", &self.on_press.is_some())
            .finish()
    }
}

impl Button {
    /// Cells added around the text by the brackets.
    pub const DECORATION: u16 = 4;

    /// Create a button.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::MultilineText`] if `text` has a line break.
    pub fn new(text: impl Into<String>) -> Result<Self, ControlError> {
        Ok(Self {
            text: single_line(text)?,
            presses: 0,
            on_press: None,
        })
    }

    /// Set the press callback.
    #[must_use]
    pub fn on_press(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.on_press = Some(Box::new(handler));
        self
    }

    /// Get the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How often the button was pressed.
    #[must_use]
    pub const fn presses(&self) -> u64 {
        self.presses
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

    /// Press the button programmatically.
    pub fn press(&mut self) {
        self.presses += 1;
        if let Some(handler) = self.on_press.as_mut() {
            handler();
        }
    }
}

impl InputHandler for Button {
    fn handle_key(&mut self, key: &KeyInfo) -> KeyOutcome {
        match key.key {
            Key::Space | Key::Enter if key.modifiers.is_empty() => {
                self.press();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

impl Widget for Button {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn fixed_height(&self) -> Option<u16> {
        Some(1)
    }

    fn natural_width(&self) -> u16 {
        cell_width(&self.text).saturating_add(Self::DECORATION)
    }

    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()> {
        let (fore, back) = if ctx.focused {
            (ctx.back, ctx.fore)
        } else {
            (ctx.fore, ctx.back)
        };
        let face = format!("[ {} ]", self.text);
        ctx.write(surface, 0, &face, fore, back)?;

        let used = cell_width(&face);
        if ctx.boundary.width > used {
            let rest = " ".repeat(usize::from(ctx.boundary.width - used));
            surface.write(
                ctx.boundary.left + used,
                ctx.boundary.top,
                &rest,
                Some(ctx.boundary),
                ctx.fore,
                ctx.back,
            )?;
        }
        Ok(())
    }

    fn accepts_input(&self) -> bool {
        true
    }

    fn input_handler(&mut self) -> Option<&mut dyn InputHandler> {
        Some(self)
    }

    fn focus_changed(&mut self, _focused: bool) -> bool {
        true
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
    use fogterm_core::{CharacterSet, Color, KeyModifiers, Rect, RecordingSurface};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ctx(charset: &CharacterSet, width: u16, focused: bool) -> DrawContext<'_> {
        DrawContext {
            boundary: Rect::new(1, 0, width, 1),
            fore: Color::WHITE,
            back: Color::DARK_BLUE,
            focused,
            name: "ok",
            charset,
        }
    }

    #[test]
    fn test_button_natural_width() {
        let button = Button::new("OK").unwrap();
        assert_eq!(button.natural_width(), 6);
        assert_eq!(button.fixed_height(), Some(1));
        assert!(button.accepts_input());
    }

    #[test]
    fn test_button_draws_brackets() {
        let charset = CharacterSet::default();
        let mut surface = RecordingSurface::new(10, 1);
        let button = Button::new("OK").unwrap();
        button.draw(&ctx(&charset, 6, false), &mut surface).unwrap();
        assert_eq!(surface.row_text(0), " [ OK ]   ");
        assert_eq!(surface.cell(2, 0).unwrap().back, Color::DARK_BLUE);
    }

    #[test]
    fn test_focused_button_is_inverted() {
        let charset = CharacterSet::default();
        let mut surface = RecordingSurface::new(10, 1);
        let button = Button::new("OK").unwrap();
        button.draw(&ctx(&charset, 8, true), &mut surface).unwrap();
        let cell = surface.cell(2, 0).unwrap();
        assert_eq!(cell.fore, Color::DARK_BLUE);
        assert_eq!(cell.back, Color::WHITE);
        assert_eq!(surface.cell(8, 0).unwrap().back, Color::DARK_BLUE);
    }

    #[test]
    fn test_button_clipped_to_boundary() {
        let charset = CharacterSet::default();
        let mut surface = RecordingSurface::new(10, 1);
        let button = Button::new("Cancel").unwrap();
        button.draw(&ctx(&charset, 4, false), &mut surface).unwrap();
        assert_eq!(surface.row_text(0), " [ Ca     ");
    }

    #[test]
    fn test_space_and_enter_press() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut button = Button::new("Go")
            .unwrap()
            .on_press(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(button.handle_key(&KeyInfo::new(Key::Space)), KeyOutcome::Handled);
        assert_eq!(button.handle_key(&KeyInfo::new(Key::Enter)), KeyOutcome::Handled);
        assert_eq!(button.handle_key(&KeyInfo::new(Key::Tab)), KeyOutcome::Ignored);
        assert_eq!(button.handle_key(&KeyInfo::new(Key::Char('x'))), KeyOutcome::Ignored);
        let ctrl_space = KeyInfo::new(Key::Space).with_modifiers(KeyModifiers::CONTROL);
        assert_eq!(button.handle_key(&ctrl_space), KeyOutcome::Ignored);

        assert_eq!(button.presses(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_focus_change_requests_repaint() {
        let mut button = Button::new("Go").unwrap();
        assert!(button.focus_changed(true));
        assert!(button.focus_changed(false));
    }
}
