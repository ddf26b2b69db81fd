//! Two-phase layout and paint.
//!
//! [`ControlTree::compute_boundary`] resolves absolute, clipped rectangles
//! top-down; [`ControlTree::draw`] paints a subtree into a [`Surface`]. A
//! control must have been laid out before it can be drawn.

use crate::charset::CharacterSet;
use crate::color::Color;
use crate::control::{ContainerStyle, ControlBody, ControlId, LayoutState};
use crate::error::DrawError;
use crate::geometry::Rect;
use crate::surface::{BoxStyle, Surface};
use crate::tree::ControlTree;
use crate::widget::DrawContext;
use tracing::trace;

/// Fill colors cycled through by panels in debug mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugPalette {
    colors: Vec<Color>,
    next: usize,
}

impl DebugPalette {
    /// Palette cycling through `colors`.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors, next: 0 }
    }

    /// Next fill color, wrapping around. `None` for an empty palette.
    pub fn next_color(&mut self) -> Option<Color> {
        let color = self.colors.get(self.next % self.colors.len().max(1)).copied();
        self.next = self.next.wrapping_add(1);
        color
    }

    /// Start the cycle again.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Default for DebugPalette {
    fn default() -> Self {
        Self::new(vec![
            Color::DARK_BLUE,
            Color::DARK_GREEN,
            Color::DARK_CYAN,
            Color::DARK_RED,
            Color::DARK_MAGENTA,
            Color::DARK_YELLOW,
        ])
    }
}

/// Settings for a paint pass.
#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    /// Glyphs for borders
    pub charset: CharacterSet,
    /// Set in debug mode
    pub debug: Option<DebugPalette>,
}

impl DrawOptions {
    /// Options with debug overlays enabled.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            charset: CharacterSet::default(),
            debug: Some(DebugPalette::default()),
        }
    }
}

impl ControlTree {
    /// Resolve the absolute boundary of `id` and of its whole subtree.
    ///
    /// The natural rectangle is `(left_offset + left, top_offset + top)`
    /// with the declared size; leaves with width 0 use the widget's natural
    /// width, containers with width or height 0 stretch to the remaining
    /// extent of `parent`. The result is clipped so it never extends past
    /// `parent`'s right or bottom edge.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::UnknownControl`] for unknown ids.
    pub fn compute_boundary(
        &mut self,
        id: ControlId,
        left_offset: u16,
        top_offset: u16,
        parent: Rect,
    ) -> Result<Rect, DrawError> {
        let control = self.get_mut(id).map_err(|_| DrawError::UnknownControl(id))?;

        let left = left_offset.saturating_add(control.left);
        let top = top_offset.saturating_add(control.top);
        let (width, height) = match &control.body {
            ControlBody::Container { .. } => (
                if control.width == 0 {
                    parent.right().saturating_sub(left)
                } else {
                    control.width
                },
                if control.height == 0 {
                    parent.bottom().saturating_sub(top)
                } else {
                    control.height
                },
            ),
            ControlBody::Leaf(_) => (control.effective_width(), control.effective_height()),
        };

        let boundary = Rect::new(left, top, width, height).clip_to(&parent);
        control.layout = Some(LayoutState {
            boundary,
            left_offset,
            top_offset,
            parent,
        });

        if let ControlBody::Container { children, style } = &control.body {
            let inner = boundary.inset(style.inset());
            let children = children.clone();
            trace!(%id, ?boundary, children = children.len(), "container laid out");
            for child in children {
                self.compute_boundary(child, inner.left, inner.top, inner)?;
            }
        }
        Ok(boundary)
    }

    /// Lay out `id` again with the inputs of its last layout pass.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::BoundaryNotComputed`] if it was never laid out.
    pub fn relayout(&mut self, id: ControlId) -> Result<Rect, DrawError> {
        let state = self
            .get(id)
            .map_err(|_| DrawError::UnknownControl(id))?
            .layout
            .ok_or(DrawError::BoundaryNotComputed(id))?;
        self.compute_boundary(id, state.left_offset, state.top_offset, state.parent)
    }

    /// Paint `id` and its subtree.
    ///
    /// Empty boundaries paint nothing. Containers paint their background or
    /// border first, then every child in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::BoundaryNotComputed`] if any control in the
    /// subtree was never laid out, and surface errors as they occur.
    pub fn draw(
        &self,
        id: ControlId,
        surface: &mut dyn Surface,
        options: &mut DrawOptions,
    ) -> Result<(), DrawError> {
        let control = self.get(id).map_err(|_| DrawError::UnknownControl(id))?;
        let boundary = control.boundary().ok_or(DrawError::BoundaryNotComputed(id))?;
        if boundary.is_empty() {
            return Ok(());
        }

        let (fore, back) = (control.fore_color(), control.back_color());
        match &control.body {
            ControlBody::Container { children, style } => {
                match style {
                    ContainerStyle::Panel => {
                        let back = options
                            .debug
                            .as_mut()
                            .and_then(DebugPalette::next_color)
                            .unwrap_or(back);
                        surface.fill(boundary, Some(boundary), fore, back)?;
                        if options.debug.is_some() && !control.name.is_empty() {
                            let label = format!("{{{}}}", control.name);
                            surface.write(
                                boundary.left,
                                boundary.top,
                                &label,
                                Some(boundary),
                                fore,
                                back,
                            )?;
                        }
                    }
                    ContainerStyle::Groupbox { header } => {
                        surface.draw_box(
                            boundary,
                            &options.charset,
                            Some(boundary),
                            BoxStyle::filled(fore, back),
                        )?;
                        if !header.is_empty() && boundary.width > 3 {
                            let clip = Rect::new(
                                boundary.left + 2,
                                boundary.top,
                                boundary.width - 3,
                                1,
                            );
                            surface.write(clip.left, clip.top, header, Some(clip), fore, back)?;
                        }
                    }
                }
                for &child in children {
                    self.draw(child, surface, options)?;
                }
            }
            ControlBody::Leaf(widget) => {
                let ctx = DrawContext {
                    boundary,
                    fore,
                    back,
                    focused: control.focused,
                    name: &control.name,
                    charset: &options.charset,
                };
                widget.draw(&ctx, surface)?;
            }
        }
        Ok(())
    }
}
