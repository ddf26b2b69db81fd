//! Geometric primitives in character cells.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle measured in terminal cells.
///
/// `right()` and `bottom()` are exclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Column of the left edge
    pub left: u16,
    /// Row of the top edge
    pub top: u16,
    /// Width in cells
    pub width: u16,
    /// Height in cells
    pub height: u16,
}

impl Rect {
    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    /// Create a new rectangle.
    #[must_use]
    pub const fn new(left: u16, top: u16, width: u16, height: u16) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin with the given extent.
    #[must_use]
    pub const fn from_extent(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge (`left + width`).
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge (`top + height`).
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.top.saturating_add(self.height)
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// True if the rectangle covers no cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if the cell at (`column`, `row`) lies inside.
    #[must_use]
    pub const fn contains_cell(&self, column: u16, row: u16) -> bool {
        column >= self.left && column < self.right() && row >= self.top && row < self.bottom()
    }

    /// Check if `other` lies completely inside this rectangle.
    ///
    /// An empty rectangle is contained when its origin does not lie past
    /// this rectangle's exclusive edges.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink width and height so the rectangle does not extend past the
    /// right or bottom edge of `parent`.
    ///
    /// `left` and `top` are never shifted. A rectangle starting past the
    /// parent's edge collapses to zero size in that dimension.
    #[must_use]
    pub const fn clip_to(&self, parent: &Self) -> Self {
        let mut clipped = *self;
        if clipped.right() > parent.right() {
            clipped.width = parent.right().saturating_sub(clipped.left);
        }
        if clipped.bottom() > parent.bottom() {
            clipped.height = parent.bottom().saturating_sub(clipped.top);
        }
        clipped
    }

    /// Calculate intersection with another rectangle.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Self::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Create a new rectangle inset by `amount` cells on every side.
    #[must_use]
    pub const fn inset(&self, amount: u16) -> Self {
        Self::new(
            self.left.saturating_add(amount),
            self.top.saturating_add(amount),
            self.width.saturating_sub(amount.saturating_mul(2)),
            self.height.saturating_sub(amount.saturating_mul(2)),
        )
    }

    /// Copy with a different width.
    #[must_use]
    pub const fn with_width(&self, width: u16) -> Self {
        Self::new(self.left, self.top, width, self.height)
    }

    /// Copy with a different height.
    #[must_use]
    pub const fn with_height(&self, height: u16) -> Self {
        Self::new(self.left, self.top, self.width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_default() {
        let r = Rect::default();
        assert_eq!(r, Rect::ZERO);
        assert_eq!(r.area(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_rect_edges_are_exclusive() {
        let r = Rect::new(2, 3, 10, 4);
        assert_eq!(r.right(), 12);
        assert_eq!(r.bottom(), 7);
        assert!(r.contains_cell(11, 6));
        assert!(!r.contains_cell(12, 6));
        assert!(!r.contains_cell(11, 7));
    }

    #[test]
    fn test_clip_to_shrinks_width() {
        let parent = Rect::new(0, 0, 10, 5);
        let child = Rect::new(8, 0, 5, 1);
        let clipped = child.clip_to(&parent);
        assert_eq!(clipped, Rect::new(8, 0, 2, 1));
    }

    #[test]
    fn test_clip_to_shrinks_height() {
        let parent = Rect::new(1, 1, 10, 5);
        let child = Rect::new(1, 4, 3, 6);
        assert_eq!(child.clip_to(&parent), Rect::new(1, 4, 3, 2));
    }

    #[test]
    fn test_clip_to_past_edge_collapses() {
        let parent = Rect::new(0, 0, 10, 5);
        let child = Rect::new(12, 7, 3, 3);
        let clipped = child.clip_to(&parent);
        assert_eq!(clipped.left, 12);
        assert_eq!(clipped.top, 7);
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_clip_to_inside_is_identity() {
        let parent = Rect::new(0, 0, 80, 25);
        let child = Rect::new(4, 4, 10, 3);
        assert_eq!(child.clip_to(&parent), child);
    }

    #[test]
    fn test_inset_saturates() {
        assert_eq!(Rect::new(5, 5, 10, 4).inset(1), Rect::new(6, 6, 8, 2));
        assert_eq!(Rect::new(0, 0, 1, 1).inset(1), Rect::new(1, 1, 0, 0));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 2, 2)), None);
    }

    proptest! {
        #[test]
        fn prop_clipped_child_inside_parent(
            pl in 0u16..100, pt in 0u16..100, pw in 0u16..100, ph in 0u16..100,
            dl in 0u16..150, dt in 0u16..150, cw in 0u16..200, ch in 0u16..200,
        ) {
            let parent = Rect::new(pl, pt, pw, ph);
            let child = Rect::new(pl + dl, pt + dt, cw, ch);
            let clipped = child.clip_to(&parent);
            prop_assert_eq!(clipped.left, child.left);
            prop_assert_eq!(clipped.top, child.top);
            prop_assert!(clipped.right() <= parent.right().max(child.left));
            prop_assert!(clipped.bottom() <= parent.bottom().max(child.top));
            if child.left < parent.right() && child.top < parent.bottom() {
                prop_assert!(parent.contains(&clipped));
            }
        }
    }
}
