//! Keyboard focus navigation.
//!
//! The focus manager keeps a flattened list of focusable controls in tab
//! order: depth-first through the tree, siblings ordered by ascending tab
//! index (stable, so equal indices keep insertion order). Tab cycles through
//! that list; arrow keys move between controls sharing a row or column.

use crate::control::ControlId;
use crate::error::FocusError;
use crate::event::Key;
use crate::tree::ControlTree;
use tracing::debug;

/// Which keys the focus manager responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    /// Tab plus the four arrow keys
    #[default]
    Spatial,
    /// Tab only
    TabOnly,
}

impl NavigationMode {
    /// Keys this mode declares as handled.
    #[must_use]
    pub const fn keys(self) -> &'static [Key] {
        match self {
            Self::Spatial => &[Key::Tab, Key::Up, Key::Down, Key::Left, Key::Right],
            Self::TabOnly => &[Key::Tab],
        }
    }
}

/// Focusable controls below `root` in tab order. `root` itself is never
/// part of the list.
#[must_use]
pub fn tab_order(tree: &ControlTree, root: ControlId) -> Vec<ControlId> {
    let mut order = Vec::new();
    collect(tree, root, &mut order);
    order
}

fn collect(tree: &ControlTree, container: ControlId, order: &mut Vec<ControlId>) {
    let Ok(children) = tree.children(container) else {
        return;
    };
    let mut children: Vec<(i32, ControlId)> = children
        .iter()
        .filter_map(|&id| tree.get(id).ok().map(|c| (c.tab_index(), id)))
        .collect();
    children.sort_by_key(|&(tab_index, _)| tab_index);

    for (_, id) in children {
        let Ok(control) = tree.get(id) else { continue };
        if control.is_container() {
            collect(tree, id, order);
        } else if control.accepts_input() {
            order.push(id);
        }
    }
}

/// Tracks the focused control and resolves navigation keys.
#[derive(Debug, Clone)]
pub struct FocusManager {
    root: ControlId,
    mode: NavigationMode,
    order: Vec<ControlId>,
    focused: Option<usize>,
}

impl FocusManager {
    /// Create a manager for the tree below `root`, focusing `start`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a top-level container, or if `start` is
    /// detached, does not accept input, or is not below `root`.
    pub fn new(
        tree: &mut ControlTree,
        root: ControlId,
        start: ControlId,
        mode: NavigationMode,
    ) -> Result<Self, FocusError> {
        let root_control = tree.get(root).map_err(|_| FocusError::UnknownControl(root))?;
        if !root_control.is_container() {
            return Err(FocusError::RootNotContainer(root));
        }
        if root_control.container().is_some() {
            return Err(FocusError::RootHasContainer(root));
        }

        let start_control = tree.get(start).map_err(|_| FocusError::UnknownControl(start))?;
        if start_control.container().is_none() {
            return Err(FocusError::StartDetached(start));
        }
        if !start_control.accepts_input() {
            return Err(FocusError::NotInputHandler(start));
        }

        let order = tab_order(tree, root);
        let index = order
            .iter()
            .position(|&id| id == start)
            .ok_or(FocusError::StartNotInTree(start))?;

        for &id in &order {
            set_focus_flag(tree, id, id == start)?;
        }
        debug!(%root, %start, focusable = order.len(), "focus manager created");
        Ok(Self {
            root,
            mode,
            order,
            focused: Some(index),
        })
    }

    /// Root of the managed tree.
    #[must_use]
    pub const fn root(&self) -> ControlId {
        self.root
    }

    /// Navigation mode.
    #[must_use]
    pub const fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// True if `key` is in the declared key set.
    #[must_use]
    pub fn handles(&self, key: Key) -> bool {
        self.mode.keys().contains(&key)
    }

    /// Focusable controls in tab order.
    #[must_use]
    pub fn order(&self) -> &[ControlId] {
        &self.order
    }

    /// Currently focused control.
    #[must_use]
    pub fn focused(&self) -> Option<ControlId> {
        self.focused.and_then(|index| self.order.get(index).copied())
    }

    /// Recompute the tab order after the tree changed.
    ///
    /// Keeps the focused control if it is still reachable, otherwise
    /// clears its flag and focuses the first entry.
    ///
    /// # Errors
    ///
    /// Returns [`FocusError::UnknownControl`] if the root is gone.
    pub fn rebuild(&mut self, tree: &mut ControlTree) -> Result<(), FocusError> {
        if !tree.exists(self.root) {
            return Err(FocusError::UnknownControl(self.root));
        }
        let previous = self.focused();
        self.order = tab_order(tree, self.root);
        self.focused = previous.and_then(|id| self.order.iter().position(|&c| c == id));

        if self.focused.is_none() {
            if let Some(old) = previous.filter(|&id| tree.exists(id)) {
                set_focus_flag(tree, old, false)?;
            }
            if let Some(&first) = self.order.first() {
                set_focus_flag(tree, first, true)?;
                self.focused = Some(0);
            }
        }
        debug!(
            focusable = self.order.len(),
            focused = ?self.focused(),
            "tab order rebuilt"
        );
        Ok(())
    }

    /// Move focus to `id`.
    ///
    /// Returns `false` if `id` is not in the tab order.
    ///
    /// # Errors
    ///
    /// Returns [`FocusError::UnknownControl`] if a control vanished.
    pub fn focus(&mut self, tree: &mut ControlTree, id: ControlId) -> Result<bool, FocusError> {
        match self.order.iter().position(|&c| c == id) {
            Some(index) => {
                self.move_to(tree, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve a navigation key.
    ///
    /// Returns the newly focused control, or `None` if focus stayed put.
    ///
    /// # Errors
    ///
    /// Returns [`FocusError::UnhandledKey`] for keys outside the declared
    /// set.
    pub fn handle_key(
        &mut self,
        tree: &mut ControlTree,
        key: Key,
    ) -> Result<Option<ControlId>, FocusError> {
        if !self.handles(key) {
            return Err(FocusError::UnhandledKey(key));
        }
        if self.order.is_empty() {
            return Ok(None);
        }

        let target = if key == Key::Tab {
            Some(self.focused.map_or(0, |index| (index + 1) % self.order.len()))
        } else {
            self.spatial_target(tree, key)
        };

        match target {
            Some(index) if Some(index) != self.focused => {
                self.move_to(tree, index)?;
                Ok(self.focused())
            }
            _ => Ok(None),
        }
    }

    fn spatial_target(&self, tree: &ControlTree, key: Key) -> Option<usize> {
        let current = self.focused()?;
        let origin = tree.get(current).ok()?.boundary()?;

        let mut candidates: Vec<(usize, u16, u16)> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                let boundary = tree.get(id).ok()?.boundary()?;
                let aligned = match key {
                    Key::Left | Key::Right => boundary.top == origin.top,
                    _ => boundary.left == origin.left,
                };
                aligned.then_some((index, boundary.left, boundary.top))
            })
            .collect();

        match key {
            Key::Left | Key::Right => {
                candidates.sort_by_key(|&(_, left, _)| std::cmp::Reverse(left));
            }
            _ => candidates.sort_by_key(|&(_, _, top)| top),
        }

        let position = candidates
            .iter()
            .position(|&(index, _, _)| Some(index) == self.focused)?;
        let neighbour = match key {
            Key::Up | Key::Right => position.checked_sub(1)?,
            _ => position + 1,
        };
        candidates.get(neighbour).map(|&(index, _, _)| index)
    }

    fn move_to(&mut self, tree: &mut ControlTree, index: usize) -> Result<(), FocusError> {
        let Some(&next) = self.order.get(index) else {
            return Ok(());
        };
        if let Some(current) = self.focused() {
            set_focus_flag(tree, current, false)?;
        }
        set_focus_flag(tree, next, true)?;
        self.focused = Some(index);
        debug!(focused = %next, "focus moved");
        Ok(())
    }
}

fn set_focus_flag(tree: &mut ControlTree, id: ControlId, focused: bool) -> Result<(), FocusError> {
    tree.set_focused(id, focused)
        .map(|_| ())
        .map_err(|_| FocusError::UnknownControl(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Control;
    use crate::geometry::Rect;
    use crate::testing::StubWidget;

    fn button(tree: &mut ControlTree, left: u16, top: u16, tab_index: i32) -> ControlId {
        tree.insert(
            Control::leaf(StubWidget::new("btn").focusable())
                .with_position(left, top)
                .with_tab_index(tab_index),
        )
    }

    #[test]
    fn test_tab_order_sorted_by_tab_index() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let b3 = button(&mut tree, 0, 0, 3);
        let b2 = button(&mut tree, 0, 1, 2);
        let b1 = button(&mut tree, 0, 2, 1);
        for b in [b3, b2, b1] {
            tree.add(root, b).unwrap();
        }
        assert_eq!(tab_order(&tree, root), vec![b1, b2, b3]);
    }

    #[test]
    fn test_tab_order_depth_first_and_stable() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let inner = tree.insert(Control::panel().with_tab_index(1));
        let a = button(&mut tree, 0, 0, 0);
        let b = button(&mut tree, 0, 1, 0);
        let nested = button(&mut tree, 0, 0, 0);
        let label = tree.insert(Control::leaf(StubWidget::new("label")));
        let last = button(&mut tree, 0, 2, 5);
        tree.add(inner, nested).unwrap();
        for id in [last, a, inner, label, b] {
            tree.add(root, id).unwrap();
        }
        assert_eq!(tab_order(&tree, root), vec![a, b, nested, last]);
    }

    #[test]
    fn test_new_validates_preconditions() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let label = tree.insert(Control::leaf(StubWidget::new("label")));
        let detached = button(&mut tree, 0, 0, 0);
        let other_root = tree.insert(Control::panel());
        let elsewhere = button(&mut tree, 0, 0, 0);
        tree.add(root, label).unwrap();
        tree.add(other_root, elsewhere).unwrap();

        let mode = NavigationMode::Spatial;
        assert_eq!(
            FocusManager::new(&mut tree, label, label, mode).unwrap_err(),
            FocusError::RootNotContainer(label)
        );
        assert_eq!(
            FocusManager::new(&mut tree, root, detached, mode).unwrap_err(),
            FocusError::StartDetached(detached)
        );
        assert_eq!(
            FocusManager::new(&mut tree, root, label, mode).unwrap_err(),
            FocusError::NotInputHandler(label)
        );
        assert_eq!(
            FocusManager::new(&mut tree, root, elsewhere, mode).unwrap_err(),
            FocusError::StartNotInTree(elsewhere)
        );

        tree.add(root, other_root).unwrap();
        assert_eq!(
            FocusManager::new(&mut tree, other_root, elsewhere, mode).unwrap_err(),
            FocusError::RootHasContainer(other_root)
        );
    }

    #[test]
    fn test_new_sets_focus_flags() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let a = button(&mut tree, 0, 0, 0);
        let b = button(&mut tree, 0, 1, 0);
        tree.add(root, a).unwrap();
        tree.add(root, b).unwrap();
        tree.set_focused(a, true).unwrap();

        let manager = FocusManager::new(&mut tree, root, b, NavigationMode::Spatial).unwrap();
        assert_eq!(manager.focused(), Some(b));
        assert!(!tree.get(a).unwrap().is_focused());
        assert!(tree.get(b).unwrap().is_focused());
    }

    #[test]
    fn test_tab_wraps_around() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let ids: Vec<_> = (0..3).map(|i| button(&mut tree, 0, i, i32::from(i))).collect();
        for &id in &ids {
            tree.add(root, id).unwrap();
        }
        let mut manager = FocusManager::new(&mut tree, root, ids[0], NavigationMode::TabOnly).unwrap();

        assert_eq!(manager.handle_key(&mut tree, Key::Tab), Ok(Some(ids[1])));
        assert_eq!(manager.handle_key(&mut tree, Key::Tab), Ok(Some(ids[2])));
        assert_eq!(manager.handle_key(&mut tree, Key::Tab), Ok(Some(ids[0])));
        assert!(tree.get(ids[0]).unwrap().is_focused());
        assert!(!tree.get(ids[2]).unwrap().is_focused());
    }

    #[test]
    fn test_tab_only_rejects_arrows() {
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let a = button(&mut tree, 0, 0, 0);
        tree.add(root, a).unwrap();
        let mut manager = FocusManager::new(&mut tree, root, a, NavigationMode::TabOnly).unwrap();
        assert!(!manager.handles(Key::Up));
        assert_eq!(
            manager.handle_key(&mut tree, Key::Up),
            Err(FocusError::UnhandledKey(Key::Up))
        );
        assert_eq!(
            manager.handle_key(&mut tree, Key::Enter),
            Err(FocusError::UnhandledKey(Key::Enter))
        );
    }

    fn grid() -> (ControlTree, FocusManager, [ControlId; 4]) {
        // a b
        // c d
        let mut tree = ControlTree::new();
        let root = tree.insert(Control::panel());
        let a = button(&mut tree, 0, 0, 0);
        let b = button(&mut tree, 10, 0, 1);
        let c = button(&mut tree, 0, 2, 2);
        let d = button(&mut tree, 10, 2, 3);
        for id in [a, b, c, d] {
            tree.add(root, id).unwrap();
        }
        tree.compute_boundary(root, 0, 0, Rect::from_extent(40, 10)).unwrap();
        let manager = FocusManager::new(&mut tree, root, a, NavigationMode::Spatial).unwrap();
        (tree, manager, [a, b, c, d])
    }

    #[test]
    fn test_arrows_move_along_rows_and_columns() {
        let (mut tree, mut manager, [a, b, c, d]) = grid();
        assert_eq!(manager.handle_key(&mut tree, Key::Right), Ok(Some(b)));
        assert_eq!(manager.handle_key(&mut tree, Key::Down), Ok(Some(d)));
        assert_eq!(manager.handle_key(&mut tree, Key::Left), Ok(Some(c)));
        assert_eq!(manager.handle_key(&mut tree, Key::Up), Ok(Some(a)));
    }

    #[test]
    fn test_arrows_stop_at_the_edges() {
        let (mut tree, mut manager, [a, ..]) = grid();
        assert_eq!(manager.handle_key(&mut tree, Key::Left), Ok(None));
        assert_eq!(manager.handle_key(&mut tree, Key::Up), Ok(None));
        assert_eq!(manager.handle_key(&mut tree, Key::Up), Ok(None));
        assert_eq!(manager.focused(), Some(a));
    }

    #[test]
    fn test_arrows_skip_controls_without_boundary() {
        let (mut tree, mut manager, [a, b, ..]) = grid();
        let late = button(&mut tree, 20, 0, 9);
        tree.add(manager.root(), late).unwrap();
        manager.rebuild(&mut tree).unwrap();
        assert_eq!(manager.order().len(), 5);
        assert_eq!(manager.focused(), Some(a));
        assert_eq!(manager.handle_key(&mut tree, Key::Right), Ok(Some(b)));
        assert_eq!(manager.handle_key(&mut tree, Key::Right), Ok(None));
    }

    #[test]
    fn test_rebuild_refocuses_first_when_focused_removed() {
        let (mut tree, mut manager, [a, b, ..]) = grid();
        let root = manager.root();
        tree.remove(root, a).unwrap();
        manager.rebuild(&mut tree).unwrap();
        assert_eq!(manager.focused(), Some(b));
        assert!(!tree.get(a).unwrap().is_focused());
        assert!(tree.get(b).unwrap().is_focused());
    }

    #[test]
    fn test_rebuild_empty_tree_has_no_focus() {
        let (mut tree, mut manager, _) = grid();
        tree.clear(manager.root()).unwrap();
        manager.rebuild(&mut tree).unwrap();
        assert_eq!(manager.focused(), None);
        assert_eq!(manager.handle_key(&mut tree, Key::Tab), Ok(None));
    }

    #[test]
    fn test_focus_explicit() {
        let (mut tree, mut manager, [a, _, c, _]) = grid();
        assert_eq!(manager.focus(&mut tree, c), Ok(true));
        assert!(tree.get(c).unwrap().is_focused());
        assert!(!tree.get(a).unwrap().is_focused());
        assert_eq!(manager.focus(&mut tree, manager.root()), Ok(false));
    }
}
