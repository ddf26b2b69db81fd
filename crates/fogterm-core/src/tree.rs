//! Arena-backed control tree.
//!
//! The tree owns every control. Containers hold child handles, children hold
//! their container's handle as a plain back-reference, so there is no shared
//! ownership anywhere. Every mutation validates first and only then touches
//! state; observers learn about changes from the [`TreeEvent`]s the tree
//! records while subscribed.

use crate::color::Color;
use crate::control::{
    ColorSlot, ContainerStyle, Control, ControlBody, ControlId, RedrawReason, TreeEvent,
};
use crate::error::ControlError;
use crate::event::KeyInfo;
use crate::widget::{KeyOutcome, Widget};
use tracing::{debug, trace};

#[derive(Debug)]
struct Slot {
    generation: u32,
    control: Option<Control>,
}

/// Owner of all controls.
#[derive(Debug, Default)]
pub struct ControlTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    events: Vec<TreeEvent>,
    subscribed: bool,
}

fn geometry_value(field: &'static str, value: i32) -> Result<u16, ControlError> {
    u16::try_from(value).map_err(|_| ControlError::InvalidGeometry {
        field,
        value,
        max: u16::MAX,
    })
}

/// Reason for a size change, `None` when the visible size is unchanged.
///
/// A container switching between stretched (0) and a fixed size can't be
/// compared cheaply, so it always takes the conservative path.
fn resize_reason(is_container: bool, old: u16, new: u16) -> Option<RedrawReason> {
    if old == new {
        return None;
    }
    if is_container && (old == 0 || new == 0) {
        return Some(RedrawReason::BecameSmaller);
    }
    RedrawReason::for_resize(old, new)
}

fn content_reason(declared: (u16, u16), old: (u16, u16), new: (u16, u16)) -> RedrawReason {
    let width = if declared.0 == 0 {
        RedrawReason::for_resize(old.0, new.0)
    } else {
        None
    };
    let height = if declared.1 == 0 {
        RedrawReason::for_resize(old.1, new.1)
    } else {
        None
    };
    match (width, height) {
        (Some(RedrawReason::BecameSmaller), _) | (_, Some(RedrawReason::BecameSmaller)) => {
            RedrawReason::BecameSmaller
        }
        (Some(RedrawReason::BecameBigger), _) | (_, Some(RedrawReason::BecameBigger)) => {
            RedrawReason::BecameBigger
        }
        _ => RedrawReason::ContentChanged,
    }
}

fn natural_size(widget: &dyn Widget) -> (u16, u16) {
    (widget.natural_width(), widget.natural_height())
}

impl ControlTree {
    /// Empty tree, not subscribed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a detached control.
    ///
    /// Dimensions pinned by the widget override whatever the control
    /// declared.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, mut control: Control) -> ControlId {
        if let ControlBody::Leaf(widget) = &control.body {
            if let Some(width) = widget.fixed_width() {
                control.width = width;
            }
            if let Some(height) = widget.fixed_height() {
                control.height = height;
            }
        }

        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.control = Some(control);
            ControlId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                control: Some(control),
            });
            ControlId::new(index, 0)
        };
        trace!(%id, "control inserted");
        id
    }

    /// Number of live controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if no control is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `id` refers to a live control.
    #[must_use]
    pub fn exists(&self, id: ControlId) -> bool {
        self.get(id).is_ok()
    }

    /// Look up a control.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for stale or foreign ids.
    pub fn get(&self, id: ControlId) -> Result<&Control, ControlError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.control.as_ref())
            .ok_or(ControlError::UnknownControl(id))
    }

    pub(crate) fn get_mut(&mut self, id: ControlId) -> Result<&mut Control, ControlError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.control.as_mut())
            .ok_or(ControlError::UnknownControl(id))
    }

    // ---- notifications ----

    /// Start recording [`TreeEvent`]s.
    pub fn subscribe(&mut self) {
        self.subscribed = true;
    }

    /// Stop recording and drop anything not yet drained.
    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.events.clear();
    }

    /// True while events are recorded.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Events recorded so far, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &[TreeEvent] {
        &self.events
    }

    /// Take all recorded events.
    pub fn drain_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: TreeEvent) {
        if self.subscribed {
            trace!(?event, "tree event");
            self.events.push(event);
        }
    }

    fn redraw(&mut self, id: ControlId, reason: RedrawReason) -> Option<RedrawReason> {
        self.emit(TreeEvent::Redraw { id, reason });
        Some(reason)
    }

    // ---- geometry ----

    /// Set the row relative to the container.
    ///
    /// # Errors
    ///
    /// Fails for negative values or unknown ids; the old value is kept.
    pub fn set_top(&mut self, id: ControlId, top: i32) -> Result<Option<RedrawReason>, ControlError> {
        let top = geometry_value("top", top)?;
        let control = self.get_mut(id)?;
        if control.top == top {
            return Ok(None);
        }
        control.top = top;
        Ok(self.redraw(id, RedrawReason::Moved))
    }

    /// Set the column relative to the container.
    ///
    /// # Errors
    ///
    /// Fails for negative values or unknown ids; the old value is kept.
    pub fn set_left(
        &mut self,
        id: ControlId,
        left: i32,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let left = geometry_value("left", left)?;
        let control = self.get_mut(id)?;
        if control.left == left {
            return Ok(None);
        }
        control.left = left;
        Ok(self.redraw(id, RedrawReason::Moved))
    }

    /// Set the declared width (0 = natural width / stretch).
    ///
    /// # Errors
    ///
    /// Fails for negative values, unknown ids, or when the widget pins the
    /// width.
    pub fn set_width(
        &mut self,
        id: ControlId,
        width: i32,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let width = geometry_value("width", width)?;
        let control = self.get_mut(id)?;
        if control.widget().and_then(|w| w.fixed_width()).is_some() {
            return Err(ControlError::FixedDimension { id, field: "width" });
        }
        if control.width == width {
            return Ok(None);
        }
        let old = control.effective_width();
        control.width = width;
        let reason = resize_reason(control.is_container(), old, control.effective_width());
        Ok(reason.and_then(|reason| self.redraw(id, reason)))
    }

    /// Set the declared height (0 = natural height / stretch).
    ///
    /// # Errors
    ///
    /// Fails for negative values, unknown ids, or when the widget pins the
    /// height.
    pub fn set_height(
        &mut self,
        id: ControlId,
        height: i32,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let height = geometry_value("height", height)?;
        let control = self.get_mut(id)?;
        if control.widget().and_then(|w| w.fixed_height()).is_some() {
            return Err(ControlError::FixedDimension {
                id,
                field: "height",
            });
        }
        if control.height == height {
            return Ok(None);
        }
        let old = control.effective_height();
        control.height = height;
        let reason = resize_reason(control.is_container(), old, control.effective_height());
        Ok(reason.and_then(|reason| self.redraw(id, reason)))
    }

    // ---- appearance ----

    /// Set an explicit foreground color and retint inheriting descendants.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn set_fore_color(
        &mut self,
        id: ControlId,
        color: Color,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let control = self.get_mut(id)?;
        control.fore = ColorSlot::Explicit(color);
        let back = control.back_color();
        self.retint_children(id, color, back);
        Ok(self.redraw(id, RedrawReason::ContentChanged))
    }

    /// Set an explicit background color and retint inheriting descendants.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn set_back_color(
        &mut self,
        id: ControlId,
        color: Color,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let control = self.get_mut(id)?;
        control.back = ColorSlot::Explicit(color);
        let fore = control.fore_color();
        self.retint_children(id, fore, color);
        Ok(self.redraw(id, RedrawReason::ContentChanged))
    }

    /// Copy `fore`/`back` into every inherited color slot of the subtree
    /// rooted at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn apply_inherited_colors(
        &mut self,
        id: ControlId,
        fore: Color,
        back: Color,
    ) -> Result<(), ControlError> {
        self.get(id)?;
        self.inherit_colors(id, fore, back);
        Ok(())
    }

    fn retint_children(&mut self, id: ControlId, fore: Color, back: Color) {
        let children = self.get(id).map(|c| c.children().to_vec()).unwrap_or_default();
        for child in children {
            self.inherit_colors(child, fore, back);
        }
    }

    fn inherit_colors(&mut self, id: ControlId, fore: Color, back: Color) {
        let mut stack = vec![(id, fore, back)];
        while let Some((id, fore, back)) = stack.pop() {
            let Ok(control) = self.get_mut(id) else {
                continue;
            };
            if !control.fore.is_explicit() {
                control.fore = ColorSlot::Inherited(fore);
            }
            if !control.back.is_explicit() {
                control.back = ColorSlot::Inherited(back);
            }
            let (fore, back) = (control.fore_color(), control.back_color());
            stack.extend(control.children().iter().map(|&child| (child, fore, back)));
        }
    }

    /// Rename a control.
    ///
    /// # Errors
    ///
    /// Fails with [`ControlError::DuplicateName`] if a sibling already uses
    /// the name.
    pub fn set_name(
        &mut self,
        id: ControlId,
        name: impl Into<String>,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let name = name.into();
        let control = self.get(id)?;
        if control.name == name {
            return Ok(None);
        }
        if let Some(container) = control.container {
            self.check_unique_name(container, &name, Some(id))?;
        }
        self.get_mut(id)?.name = name;
        Ok(self.redraw(id, RedrawReason::ContentChanged))
    }

    /// Change the tab index.
    ///
    /// Returns `true` if the value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn set_tab_index(&mut self, id: ControlId, tab_index: i32) -> Result<bool, ControlError> {
        let control = self.get_mut(id)?;
        if control.tab_index == tab_index {
            return Ok(false);
        }
        control.tab_index = tab_index;
        self.emit(TreeEvent::TabOrderChanged { id });
        Ok(true)
    }

    /// Toggle the focus flag.
    ///
    /// Requests a repaint only if the widget asks for one.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn set_focused(
        &mut self,
        id: ControlId,
        focused: bool,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let control = self.get_mut(id)?;
        if control.focused == focused {
            return Ok(None);
        }
        control.focused = focused;
        let repaint = match &mut control.body {
            ControlBody::Leaf(widget) => widget.focus_changed(focused),
            ControlBody::Container { .. } => false,
        };
        self.emit(TreeEvent::FocusChanged { id, focused });
        Ok(if repaint {
            self.redraw(id, RedrawReason::ContentChanged)
        } else {
            None
        })
    }

    /// Change a groupbox header.
    ///
    /// # Errors
    ///
    /// Fails for headers with line breaks and for controls that are not a
    /// groupbox.
    pub fn set_header(
        &mut self,
        id: ControlId,
        header: impl Into<String>,
    ) -> Result<Option<RedrawReason>, ControlError> {
        let header = header.into();
        if header.contains(['\n', '\r']) {
            return Err(ControlError::MultilineText);
        }
        let control = self.get_mut(id)?;
        match &mut control.body {
            ControlBody::Container {
                style: ContainerStyle::Groupbox { header: current },
                ..
            } => {
                if *current == header {
                    return Ok(None);
                }
                *current = header;
            }
            ControlBody::Container { .. } => {
                return Err(ControlError::WidgetTypeMismatch { id, actual: "Panel" });
            }
            ControlBody::Leaf(_) => return Err(ControlError::NotAContainer(id)),
        }
        Ok(self.redraw(id, RedrawReason::ContentChanged))
    }

    // ---- structure ----

    /// Children of `container` in paint order.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn children(&self, container: ControlId) -> Result<&[ControlId], ControlError> {
        match &self.get(container)?.body {
            ControlBody::Container { children, .. } => Ok(children),
            ControlBody::Leaf(_) => Err(ControlError::NotAContainer(container)),
        }
    }

    fn children_mut(&mut self, container: ControlId) -> Result<&mut Vec<ControlId>, ControlError> {
        match &mut self.get_mut(container)?.body {
            ControlBody::Container { children, .. } => Ok(children),
            ControlBody::Leaf(_) => Err(ControlError::NotAContainer(container)),
        }
    }

    /// Number of children.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn child_count(&self, container: ControlId) -> Result<usize, ControlError> {
        Ok(self.children(container)?.len())
    }

    /// Child at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`ControlError::IndexOutOfBounds`] past the end.
    pub fn child_at(&self, container: ControlId, index: usize) -> Result<ControlId, ControlError> {
        let children = self.children(container)?;
        children
            .get(index)
            .copied()
            .ok_or(ControlError::IndexOutOfBounds {
                index,
                len: children.len(),
            })
    }

    /// Child with the given name. Empty names never match.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn child_by_name(
        &self,
        container: ControlId,
        name: &str,
    ) -> Result<Option<ControlId>, ControlError> {
        let children = self.children(container)?;
        if name.is_empty() {
            return Ok(None);
        }
        Ok(children
            .iter()
            .copied()
            .find(|&child| self.get(child).is_ok_and(|c| c.name == name)))
    }

    /// Position of `child` in `container`.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn index_of(
        &self,
        container: ControlId,
        child: ControlId,
    ) -> Result<Option<usize>, ControlError> {
        Ok(self.children(container)?.iter().position(|&c| c == child))
    }

    /// True if `container` directly holds `child`.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn contains(&self, container: ControlId, child: ControlId) -> Result<bool, ControlError> {
        Ok(self.index_of(container, child)?.is_some())
    }

    /// Container holding `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn container_of(&self, id: ControlId) -> Result<Option<ControlId>, ControlError> {
        Ok(self.get(id)?.container)
    }

    /// True if `id` is `ancestor` or lies somewhere below it.
    #[must_use]
    pub fn is_under(&self, id: ControlId, ancestor: ControlId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).ok().and_then(Control::container);
        }
        false
    }

    fn check_unique_name(
        &self,
        container: ControlId,
        name: &str,
        ignore: Option<ControlId>,
    ) -> Result<(), ControlError> {
        if name.is_empty() {
            return Ok(());
        }
        let taken = self.children(container)?.iter().any(|&sibling| {
            Some(sibling) != ignore && self.get(sibling).is_ok_and(|c| c.name == name)
        });
        if taken {
            return Err(ControlError::DuplicateName {
                name: name.to_string(),
                container,
            });
        }
        Ok(())
    }

    fn check_attach(
        &self,
        container: ControlId,
        child: ControlId,
        replacing: Option<ControlId>,
    ) -> Result<(), ControlError> {
        if !self.get(container)?.is_container() {
            return Err(ControlError::NotAContainer(container));
        }
        let node = self.get(child)?;
        if let Some(holder) = node.container {
            return Err(ControlError::AlreadyAttached {
                child,
                container: holder,
            });
        }
        if self.is_under(container, child) {
            return Err(ControlError::WouldCreateCycle { child, container });
        }
        self.check_unique_name(container, &node.name, replacing)
    }

    fn attach(&mut self, container: ControlId, index: usize, child: ControlId) -> Result<(), ControlError> {
        self.children_mut(container)?.insert(index, child);
        self.get_mut(child)?.container = Some(container);
        let parent = self.get(container)?;
        let (fore, back) = (parent.fore_color(), parent.back_color());
        self.inherit_colors(child, fore, back);
        debug!(%container, %child, index, "child added");
        self.emit(TreeEvent::ChildAdded { container, child });
        Ok(())
    }

    fn detach(&mut self, container: ControlId, index: usize) -> Result<ControlId, ControlError> {
        let child = self.children_mut(container)?.remove(index);
        self.release(container, child);
        Ok(child)
    }

    fn release(&mut self, container: ControlId, child: ControlId) {
        if let Ok(control) = self.get_mut(child) {
            control.container = None;
        }
        self.invalidate_layout(child);
        debug!(%container, %child, "child removed");
        self.emit(TreeEvent::ChildRemoved { container, child });
    }

    fn invalidate_layout(&mut self, id: ControlId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Ok(control) = self.get_mut(id) {
                control.layout = None;
                stack.extend_from_slice(control.children());
            }
        }
    }

    /// Append `child` to `container`.
    ///
    /// # Errors
    ///
    /// Fails if `child` is already attached, if the add would create a
    /// cycle, or if a sibling uses the same name.
    pub fn add(&mut self, container: ControlId, child: ControlId) -> Result<(), ControlError> {
        self.check_attach(container, child, None)?;
        let index = self.child_count(container)?;
        self.attach(container, index, child)
    }

    /// Insert `child` at `index`, shifting later children.
    ///
    /// # Errors
    ///
    /// Same as [`ControlTree::add`], plus
    /// [`ControlError::IndexOutOfBounds`] for `index > len`.
    pub fn insert_at(
        &mut self,
        container: ControlId,
        index: usize,
        child: ControlId,
    ) -> Result<(), ControlError> {
        self.check_attach(container, child, None)?;
        let len = self.child_count(container)?;
        if index > len {
            return Err(ControlError::IndexOutOfBounds { index, len });
        }
        self.attach(container, index, child)
    }

    /// Detach `child` from `container`.
    ///
    /// Returns `false` if `container` does not hold it.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn remove(&mut self, container: ControlId, child: ControlId) -> Result<bool, ControlError> {
        match self.index_of(container, child)? {
            Some(index) => {
                self.detach(container, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detach the child at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`ControlError::IndexOutOfBounds`] past the end.
    pub fn remove_at(&mut self, container: ControlId, index: usize) -> Result<ControlId, ControlError> {
        self.child_at(container, index)?;
        self.detach(container, index)
    }

    /// Detach the child with the given name, if any.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn remove_by_name(
        &mut self,
        container: ControlId,
        name: &str,
    ) -> Result<Option<ControlId>, ControlError> {
        let Some(child) = self.child_by_name(container, name)? else {
            return Ok(None);
        };
        self.remove(container, child)?;
        Ok(Some(child))
    }

    /// Put `child` into the slot at `index`, detaching the previous child.
    ///
    /// Returns the detached child.
    ///
    /// # Errors
    ///
    /// Fails like [`ControlTree::insert_at`]; on failure the old child stays.
    pub fn replace(
        &mut self,
        container: ControlId,
        index: usize,
        child: ControlId,
    ) -> Result<ControlId, ControlError> {
        let old = self.child_at(container, index)?;
        if old == child {
            return Ok(old);
        }
        self.check_attach(container, child, Some(old))?;
        self.detach(container, index)?;
        self.attach(container, index, child)?;
        Ok(old)
    }

    /// Detach every child, returning them in their former order.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and leaves.
    pub fn clear(&mut self, container: ControlId) -> Result<Vec<ControlId>, ControlError> {
        let children = std::mem::take(self.children_mut(container)?);
        for &child in &children {
            self.release(container, child);
        }
        Ok(children)
    }

    /// Free a detached control and its whole subtree.
    ///
    /// # Errors
    ///
    /// Fails with [`ControlError::StillAttached`] if the control is part of a
    /// container.
    pub fn destroy(&mut self, id: ControlId) -> Result<(), ControlError> {
        if self.get(id)?.container.is_some() {
            return Err(ControlError::StillAttached(id));
        }
        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(control) = slot.control.take() {
                stack.extend_from_slice(control.children());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                freed += 1;
            }
        }
        debug!(%id, freed, "subtree destroyed");
        Ok(())
    }

    // ---- widgets ----

    /// Borrow the widget of a leaf as its concrete type.
    ///
    /// # Errors
    ///
    /// Fails for containers and for a different widget type.
    pub fn widget<W: Widget>(&self, id: ControlId) -> Result<&W, ControlError> {
        let ControlBody::Leaf(widget) = &self.get(id)?.body else {
            return Err(ControlError::NotAWidget(id));
        };
        widget
            .as_any()
            .downcast_ref::<W>()
            .ok_or(ControlError::WidgetTypeMismatch {
                id,
                actual: widget.type_name(),
            })
    }

    /// Mutate a leaf widget.
    ///
    /// `update` reports whether the widget's appearance changed. If it did,
    /// the tree requests a repaint, classified by how the widget's natural
    /// size moved for auto-sized dimensions.
    ///
    /// # Errors
    ///
    /// Fails for containers, for a different widget type, or with whatever
    /// `update` returns.
    pub fn update_widget<W, F>(
        &mut self,
        id: ControlId,
        update: F,
    ) -> Result<Option<RedrawReason>, ControlError>
    where
        W: Widget,
        F: FnOnce(&mut W) -> Result<bool, ControlError>,
    {
        let control = self.get_mut(id)?;
        let declared = (control.width, control.height);
        let ControlBody::Leaf(widget) = &mut control.body else {
            return Err(ControlError::NotAWidget(id));
        };
        let actual = widget.type_name();
        let old = natural_size(widget.as_ref());
        let typed = widget
            .as_any_mut()
            .downcast_mut::<W>()
            .ok_or(ControlError::WidgetTypeMismatch { id, actual })?;
        if !update(typed)? {
            return Ok(None);
        }
        let reason = content_reason(declared, old, natural_size(widget.as_ref()));
        Ok(self.redraw(id, reason))
    }

    /// Offer a key press to the control's input handler.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownControl`] for unknown ids.
    pub fn handle_key(&mut self, id: ControlId, key: &KeyInfo) -> Result<KeyOutcome, ControlError> {
        let control = self.get_mut(id)?;
        let declared = (control.width, control.height);
        let ControlBody::Leaf(widget) = &mut control.body else {
            return Ok(KeyOutcome::Ignored);
        };
        let old = natural_size(widget.as_ref());
        let outcome = widget
            .input_handler()
            .map_or(KeyOutcome::Ignored, |handler| handler.handle_key(key));
        if outcome == KeyOutcome::Changed {
            let reason = content_reason(declared, old, natural_size(widget.as_ref()));
            self.redraw(id, reason);
        }
        Ok(outcome)
    }
}
