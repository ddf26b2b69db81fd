//! Capability traits implemented by leaf widgets.
//!
//! A leaf control owns exactly one boxed [`Widget`]. The widget produces the
//! visible content for the boundary the layout pass hands it; optionally it
//! also accepts key input through [`InputHandler`].
//!
//! # Examples
//!
//! ```
//! use fogterm_core::{DrawContext, Surface, Widget};
//! use std::any::Any;
//! use std::io;
//!
//! struct Dot;
//!
//! impl Widget for Dot {
//!     fn type_name(&self) -> &'static str {
//!         "Dot"
//!     }
//!
//!     fn natural_width(&self) -> u16 {
//!         1
//!     }
//!
//!     fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()> {
//!         ctx.write(surface, 0, ".", ctx.fore, ctx.back)
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn as_any_mut(&mut self) -> &mut dyn Any {
//!         self
//!     }
//! }
//!
//! assert_eq!(Dot.natural_width(), 1);
//! ```

use crate::charset::CharacterSet;
use crate::color::Color;
use crate::event::KeyInfo;
use crate::geometry::Rect;
use crate::surface::Surface;
use std::any::Any;
use std::io;

/// Everything a widget needs to paint itself.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Absolute, clipped rectangle the widget may paint in
    pub boundary: Rect,
    /// Resolved foreground color
    pub fore: Color,
    /// Resolved background color
    pub back: Color,
    /// Whether the control currently has focus
    pub focused: bool,
    /// Control name
    pub name: &'a str,
    /// Active box-drawing set
    pub charset: &'a CharacterSet,
}

impl DrawContext<'_> {
    /// Write `text` on row `row` of the boundary, clipped to the boundary.
    ///
    /// # Errors
    ///
    /// Propagates surface I/O errors.
    pub fn write(
        &self,
        surface: &mut dyn Surface,
        row: u16,
        text: &str,
        fore: Color,
        back: Color,
    ) -> io::Result<()> {
        if row >= self.boundary.height {
            return Ok(());
        }
        surface.write(
            self.boundary.left,
            self.boundary.top + row,
            text,
            Some(self.boundary),
            fore,
            back,
        )
    }
}

/// Result of offering a key press to an input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key is not for this widget
    Ignored,
    /// Consumed, appearance unchanged
    Handled,
    /// Consumed and the widget needs a repaint
    Changed,
}

impl KeyOutcome {
    /// True unless the key was ignored.
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Key input capability.
pub trait InputHandler {
    /// Offer a key press to the widget.
    fn handle_key(&mut self, key: &KeyInfo) -> KeyOutcome;
}

/// Drawable leaf content.
///
/// Sizes are only hints: the layout pass clips whatever the widget asks for
/// against the container's boundary.
pub trait Widget: Any + Send {
    /// Short type name used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Width the widget pins its control to, if any.
    ///
    /// Setting the width of such a control fails.
    fn fixed_width(&self) -> Option<u16> {
        None
    }

    /// Height the widget pins its control to, if any.
    fn fixed_height(&self) -> Option<u16> {
        None
    }

    /// Width used when the control's declared width is 0.
    fn natural_width(&self) -> u16 {
        0
    }

    /// Height used when the control's declared height is 0.
    fn natural_height(&self) -> u16 {
        1
    }

    /// Paint into `ctx.boundary`. Must not write outside it.
    ///
    /// # Errors
    ///
    /// Propagates surface I/O errors.
    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) -> io::Result<()>;

    /// Whether the widget takes part in focus navigation.
    fn accepts_input(&self) -> bool {
        false
    }

    /// Input capability, if the widget has one.
    fn input_handler(&mut self) -> Option<&mut dyn InputHandler> {
        None
    }

    /// Called when the control's focus flag toggles.
    ///
    /// Return `true` to request a repaint.
    fn focus_changed(&mut self, _focused: bool) -> bool {
        false
    }

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
