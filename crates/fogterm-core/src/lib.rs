//! Core types for the fogterm terminal UI toolkit.
//!
//! This crate holds everything that does not touch a real terminal:
//! - Value types: [`Rect`], [`Color`], [`CharacterSet`], [`KeyInfo`]
//! - The control arena: [`ControlTree`], [`Control`], [`ControlId`]
//! - Layout and paint: [`ControlTree::compute_boundary`], [`ControlTree::draw`]
//! - Drawing target: [`Surface`] with the [`RecordingSurface`] test double
//! - Focus navigation: [`FocusManager`]
//!
//! # Example
//!
//! ```
//! use fogterm_core::{Control, ControlTree, DrawOptions, Rect, RecordingSurface};
//!
//! let mut tree = ControlTree::new();
//! let root = tree.insert(Control::panel().with_name("root"));
//! let group = tree.insert(Control::groupbox("Box").unwrap().with_size(10, 3));
//! tree.add(root, group).unwrap();
//!
//! tree.compute_boundary(root, 0, 0, Rect::from_extent(20, 5)).unwrap();
//! let mut surface = RecordingSurface::new(20, 5);
//! tree.draw(root, &mut surface, &mut DrawOptions::default()).unwrap();
//! assert!(surface.row_text(0).starts_with("┌─Box"));
//! ```

mod charset;
mod color;
mod control;
mod error;
mod event;
mod focus;
mod geometry;
mod layout;
mod surface;
mod tree;
pub mod widget;

#[cfg(test)]
mod testing;

pub use charset::CharacterSet;
pub use color::{Color, ColorParseError};
pub use control::{
    ColorSlot, ContainerStyle, Control, ControlBody, ControlId, RedrawReason, TreeEvent,
};
pub use error::{ControlError, DrawError, FocusError};
pub use event::{Key, KeyInfo, KeyModifiers, KeyParseError};
pub use focus::{tab_order, FocusManager, NavigationMode};
pub use geometry::Rect;
pub use layout::{DebugPalette, DrawOptions};
pub use surface::{
    clip_text, text_width, BoxStyle, RecordedCell, RecordingSurface, Surface, WriteOp,
};
pub use tree::ControlTree;
pub use widget::{DrawContext, InputHandler, KeyOutcome, Widget};
