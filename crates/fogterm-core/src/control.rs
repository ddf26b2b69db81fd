//! Control nodes and the values they carry.

use crate::color::Color;
use crate::error::ControlError;
use crate::geometry::Rect;
use crate::widget::Widget;
use std::fmt;

/// Stable handle of a control inside a [`crate::ControlTree`].
///
/// Handles of destroyed controls never resolve again, even when the slot is
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ControlId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

/// A color that was either set by the caller or copied from the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    /// Set explicitly, never overwritten by inheritance
    Explicit(Color),
    /// Copied from the container on attach
    Inherited(Color),
}

impl ColorSlot {
    /// Resolved color.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Explicit(c) | Self::Inherited(c) => c,
        }
    }

    /// True if the caller set this color.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

/// Why a control wants to be repainted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedrawReason {
    /// Position changed, size unchanged
    Moved,
    /// Size shrank
    BecameSmaller,
    /// Size grew
    BecameBigger,
    /// Appearance changed, footprint unchanged
    ContentChanged,
}

impl RedrawReason {
    /// Reason for a dimension going from `old` to `new`, `None` if equal.
    #[must_use]
    pub fn for_resize(old: u16, new: u16) -> Option<Self> {
        match new.cmp(&old) {
            std::cmp::Ordering::Greater => Some(Self::BecameBigger),
            std::cmp::Ordering::Less => Some(Self::BecameSmaller),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// True if the footprint changed and the old cells must be erased.
    #[must_use]
    pub const fn needs_container_repaint(self) -> bool {
        matches!(self, Self::Moved | Self::BecameSmaller)
    }
}

/// Notification recorded by the tree while it is subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A control asked to be repainted
    Redraw {
        /// Control to repaint
        id: ControlId,
        /// How much work the repaint needs
        reason: RedrawReason,
    },
    /// A child was attached
    ChildAdded {
        /// Receiving container
        container: ControlId,
        /// Attached control
        child: ControlId,
    },
    /// A child was detached
    ChildRemoved {
        /// Former container
        container: ControlId,
        /// Detached control
        child: ControlId,
    },
    /// A focus flag toggled
    FocusChanged {
        /// Control whose flag changed
        id: ControlId,
        /// New value
        focused: bool,
    },
    /// A tab index changed
    TabOrderChanged {
        /// Control whose tab index changed
        id: ControlId,
    },
}

/// Visual style of a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContainerStyle {
    /// Filled with the back color, children use the full boundary
    #[default]
    Panel,
    /// Single-line border with a header, children inset by one cell
    Groupbox {
        /// Text drawn into the top edge
        header: String,
    },
}

impl ContainerStyle {
    /// Cells reserved on each side before children are laid out.
    #[must_use]
    pub const fn inset(&self) -> u16 {
        match self {
            Self::Panel => 0,
            Self::Groupbox { .. } => 1,
        }
    }
}

/// Container or leaf.
pub enum ControlBody {
    /// Owns an ordered list of children
    Container {
        /// Children in paint order
        children: Vec<ControlId>,
        /// Visual style
        style: ContainerStyle,
    },
    /// Draws a single widget
    Leaf(Box<dyn Widget>),
}

impl fmt::Debug for ControlBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container { children, style } => f
                .debug_struct("Container")
                .field("children", children)
                .field("style", style)
                .finish(),
            Self::Leaf(widget) => f.debug_tuple("Leaf").field(&widget.type_name()).finish(),
        }
    }
}

/// Inputs of the last layout pass, kept so a subtree can be laid out again
/// without walking down from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LayoutState {
    pub boundary: Rect,
    pub left_offset: u16,
    pub top_offset: u16,
    pub parent: Rect,
}

/// One node of the control tree.
///
/// Controls are created detached and handed to
/// [`crate::ControlTree::insert`]; all later mutation goes through the tree
/// so that invariants and notifications stay consistent.
#[derive(Debug)]
pub struct Control {
    pub(crate) top: u16,
    pub(crate) left: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) name: String,
    pub(crate) tab_index: i32,
    pub(crate) fore: ColorSlot,
    pub(crate) back: ColorSlot,
    pub(crate) focused: bool,
    pub(crate) container: Option<ControlId>,
    pub(crate) body: ControlBody,
    pub(crate) layout: Option<LayoutState>,
}

impl Control {
    fn with_body(body: ControlBody) -> Self {
        Self {
            top: 0,
            left: 0,
            width: 0,
            height: 0,
            name: String::new(),
            tab_index: 0,
            fore: ColorSlot::Inherited(Color::DEFAULT_FORE),
            back: ColorSlot::Inherited(Color::DEFAULT_BACK),
            focused: false,
            container: None,
            body,
            layout: None,
        }
    }

    /// Panel container.
    #[must_use]
    pub fn panel() -> Self {
        Self::with_body(ControlBody::Container {
            children: Vec::new(),
            style: ContainerStyle::Panel,
        })
    }

    /// Bordered container with a header.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::MultilineText`] if the header contains a line
    /// break.
    pub fn groupbox(header: impl Into<String>) -> Result<Self, ControlError> {
        let header = header.into();
        if header.contains(['\n', '\r']) {
            return Err(ControlError::MultilineText);
        }
        Ok(Self::with_body(ControlBody::Container {
            children: Vec::new(),
            style: ContainerStyle::Groupbox { header },
        }))
    }

    /// Leaf drawing `widget`.
    #[must_use]
    pub fn leaf(widget: impl Widget) -> Self {
        Self::with_body(ControlBody::Leaf(Box::new(widget)))
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the position relative to the container.
    #[must_use]
    pub const fn with_position(mut self, left: u16, top: u16) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Set the declared size (0 = auto).
    #[must_use]
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the tab index.
    #[must_use]
    pub const fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = tab_index;
        self
    }

    /// Set an explicit foreground color.
    #[must_use]
    pub const fn with_fore_color(mut self, color: Color) -> Self {
        self.fore = ColorSlot::Explicit(color);
        self
    }

    /// Set an explicit background color.
    #[must_use]
    pub const fn with_back_color(mut self, color: Color) -> Self {
        self.back = ColorSlot::Explicit(color);
        self
    }

    /// Row relative to the container.
    #[must_use]
    pub const fn top(&self) -> u16 {
        self.top
    }

    /// Column relative to the container.
    #[must_use]
    pub const fn left(&self) -> u16 {
        self.left
    }

    /// Declared width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Declared height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Name, empty if unnamed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tab index.
    #[must_use]
    pub const fn tab_index(&self) -> i32 {
        self.tab_index
    }

    /// Resolved foreground color.
    #[must_use]
    pub const fn fore_color(&self) -> Color {
        self.fore.color()
    }

    /// Resolved background color.
    #[must_use]
    pub const fn back_color(&self) -> Color {
        self.back.color()
    }

    /// Foreground slot.
    #[must_use]
    pub const fn fore_slot(&self) -> ColorSlot {
        self.fore
    }

    /// Background slot.
    #[must_use]
    pub const fn back_slot(&self) -> ColorSlot {
        self.back
    }

    /// Focus flag.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Container holding this control.
    #[must_use]
    pub const fn container(&self) -> Option<ControlId> {
        self.container
    }

    /// Last computed boundary.
    #[must_use]
    pub fn boundary(&self) -> Option<Rect> {
        self.layout.map(|state| state.boundary)
    }

    /// True for containers.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.body, ControlBody::Container { .. })
    }

    /// Children in paint order, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[ControlId] {
        match &self.body {
            ControlBody::Container { children, .. } => children,
            ControlBody::Leaf(_) => &[],
        }
    }

    /// Container style, `None` for leaves.
    #[must_use]
    pub const fn style(&self) -> Option<&ContainerStyle> {
        match &self.body {
            ControlBody::Container { style, .. } => Some(style),
            ControlBody::Leaf(_) => None,
        }
    }

    /// Leaf widget, `None` for containers.
    #[must_use]
    pub fn widget(&self) -> Option<&dyn Widget> {
        match &self.body {
            ControlBody::Leaf(widget) => Some(widget.as_ref()),
            ControlBody::Container { .. } => None,
        }
    }

    /// True if the control takes part in focus navigation.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.widget().is_some_and(|widget| widget.accepts_input())
    }

    /// Declared width, or the widget's natural width when auto-sized.
    #[must_use]
    pub fn effective_width(&self) -> u16 {
        match (&self.body, self.width) {
            (ControlBody::Leaf(widget), 0) => widget.natural_width(),
            _ => self.width,
        }
    }

    /// Declared height, or the widget's natural height when auto-sized.
    #[must_use]
    pub fn effective_height(&self) -> u16 {
        match (&self.body, self.height) {
            (ControlBody::Leaf(widget), 0) => widget.natural_height(),
            _ => self.height,
        }
    }
}
