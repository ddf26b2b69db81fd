//! Widget double shared by the unit tests.

use crate::event::{Key, KeyInfo};
use crate::widget::{DrawContext, InputHandler, KeyOutcome, Widget};
use crate::surface::{text_width, Surface};
use std::any::Any;
use std::io;

pub struct StubWidget {
    pub text: String,
    pub pinned_height: Option<u16>,
    pub input: bool,
    pub focused: bool,
    pub presses: u32,
}

impl StubWidget {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pinned_height: None,
            input: false,
            focused: false,
            presses: 0,
        }
    }

    pub fn with_fixed_height(mut self, height: u16) -> Self {
        self.pinned_height = Some(height);
        self
    }

    pub fn focusable(mut self) -> Self {
        self.input = true;
        self
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        true
    }
}

impl InputHandler for StubWidget {
    fn handle_key(&mut self, key: &KeyInfo) -> KeyOutcome {
        match key.key {
            Key::Enter => {
                self.presses += 1;
                KeyOutcome::Changed
            }
            Key::Char(_) => KeyOutcome::Handled,
            _ => KeyOutcome::Ignored,
        }
    }
}

impl Widget for StubWidget {
    fn type_name(&self) -> &'static str {
        "StubWidget"
    }

    fn fixed_height(&self) -> Option<u16> {
        self.pinned_height
    }

    #[allow(clippy::cast_possible_truncation)]
    fn natural_width(&self) -> u16 {
        text_width(&self.text) as u16
    }

    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()> {
        ctx.write(surface, 0, &self.text, ctx.fore, ctx.back)
    }

    fn accepts_input(&self) -> bool {
        self.input
    }

    fn input_handler(&mut self) -> Option<&mut dyn InputHandler> {
        if self.input {
            Some(self)
        } else {
            None
        }
    }

    fn focus_changed(&mut self, focused: bool) -> bool {
        self.focused = focused;
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
