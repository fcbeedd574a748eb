//! Flat, arena-backed element tree.
//!
//! All per-element state lives in parallel fixed-capacity arrays indexed by
//! [`ElementIndex`].  Resetting the tree each tick is an O(1) count reset,
//! not a deallocation pass.  Elements are pushed in strict preorder, so a
//! parent's index is always smaller than any of its children's — the
//! transform pass relies on that to process ancestors first.
//!
//! # Design decisions
//!
//! * **Parallel arrays, not an object graph.**  The hierarchy is four
//!   index arrays (parent, first child, last child, next sibling) next to
//!   the element payload — no pointers, no per-node allocation.
//! * **Capacity is fixed at construction.**  Exceeding it is an error with
//!   the offending call site attached, never silent growth or truncation.

use std::panic::Location;

use thiserror::Error;

use crate::id::ElementId;
use crate::math::Vec2;

// ───────────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("element tree full (capacity {capacity}), push at {location}")]
    TreeFull {
        capacity: usize,
        location: &'static Location<'static>,
    },

    #[error("constraint list full (capacity {capacity}), push at {location}")]
    ConstraintsFull {
        capacity: usize,
        location: &'static Location<'static>,
    },
}

// ───────────────────────────────────────────────────────────────────
// Indices
// ───────────────────────────────────────────────────────────────────

/// Ephemeral position in the current frame's flat arrays.
///
/// Valid only between one `begin_ui()` and the next.  `NONE` marks a root's
/// parent and the end of child/sibling chains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElementIndex(i32);

impl ElementIndex {
    pub const NONE: ElementIndex = ElementIndex(-1);

    #[inline]
    pub fn new(index: usize) -> Self {
        ElementIndex(index as i32)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self.0 >= 0
    }

    /// Array position.  Must not be called on `NONE`.
    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(self.0 >= 0, "ElementIndex::NONE used as array index");
        self.0 as usize
    }
}

// ───────────────────────────────────────────────────────────────────
// Element
// ───────────────────────────────────────────────────────────────────

/// Layout direction selected per element via the packed flag bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Padding insets reducing an element's content rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    pub const fn all(inset: f32) -> Self {
        Padding {
            left: inset,
            right: inset,
            top: inset,
            bottom: inset,
        }
    }

    /// Leading inset along `axis` (left for X, bottom for Y — the
    /// coordinate system is bottom-left origin, Y up).
    #[inline]
    pub fn leading(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.bottom,
        }
    }

    /// Trailing inset along `axis`.
    #[inline]
    pub fn trailing(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.top,
        }
    }

    /// Total inset along `axis`.
    #[inline]
    pub fn sum(self, axis: Axis) -> f32 {
        self.leading(axis) + self.trailing(axis)
    }
}

/// A single UI element: geometry plus a packed layout-flags word.
///
/// `pos` is parent-relative; the absolute position lives in the tree's
/// `positions` array after the transform pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Element {
    pub id: ElementId,
    pub pos: Vec2,
    pub alignment: Vec2,
    pub extent: Vec2,
    pub padding: Padding,
    pub flags: u32,
}

impl Element {
    /// Major-axis selector, bits 0–1 of `flags`.
    pub const LAYOUT_AXIS_MAJOR_MASK: u32 = 0x3;
    /// Minor-axis selector, bits 2–3 of `flags`.
    pub const LAYOUT_AXIS_MINOR_MASK: u32 = 0xC;
    /// Auto-layout enable, bit 4 of `flags`.
    pub const USE_AUTO_LAYOUT_BIT: u32 = 0x10;

    pub const fn from_id(id: ElementId) -> Self {
        Element {
            id,
            pos: Vec2::ZERO,
            alignment: Vec2::ZERO,
            extent: Vec2::ZERO,
            padding: Padding::ZERO,
            flags: 0,
        }
    }

    /// Decode the major-axis field into an explicit [`Axis`].
    #[inline]
    pub fn major_axis(&self) -> Axis {
        match self.flags & Self::LAYOUT_AXIS_MAJOR_MASK {
            1 => Axis::Y,
            _ => Axis::X,
        }
    }

    /// Decode the minor-axis field into an explicit [`Axis`].
    #[inline]
    pub fn minor_axis(&self) -> Axis {
        match (self.flags & Self::LAYOUT_AXIS_MINOR_MASK) >> 2 {
            1 => Axis::Y,
            _ => Axis::X,
        }
    }

    #[inline]
    pub fn auto_layout(&self) -> bool {
        self.flags & Self::USE_AUTO_LAYOUT_BIT != 0
    }

    /// Set the packed axis fields from explicit axes and enable auto-layout.
    pub fn with_auto_layout(mut self, major: Axis, minor: Axis) -> Self {
        let major_bits = match major {
            Axis::X => 0,
            Axis::Y => 1,
        };
        let minor_bits = match minor {
            Axis::X => 0,
            Axis::Y => 1 << 2,
        };
        self.flags = (self.flags
            & !(Self::LAYOUT_AXIS_MAJOR_MASK | Self::LAYOUT_AXIS_MINOR_MASK))
            | major_bits
            | minor_bits
            | Self::USE_AUTO_LAYOUT_BIT;
        self
    }

    pub fn with_extent(mut self, width: f32, height: f32) -> Self {
        self.extent = Vec2::new(width, height);
        self
    }

    pub fn with_pos(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_alignment(mut self, x: f32, y: f32) -> Self {
        self.alignment = Vec2::new(x, y);
        self
    }
}

/// Optional external extent bounds applied during the layout pass.
#[derive(Clone, Copy, Debug)]
pub struct ElementConstraints {
    pub index: ElementIndex,
    pub min_extent: Vec2,
    pub max_extent: Vec2,
}

// ───────────────────────────────────────────────────────────────────
// ElementTree
// ───────────────────────────────────────────────────────────────────

/// Fixed-capacity element hierarchy with flat parallel storage.
///
/// Rebuilt fully every tick: `begin_ui()` invalidates all prior-frame
/// indices (but not [`ElementId`]-keyed external state).
pub struct ElementTree {
    elements: Vec<Element>,
    parents: Vec<ElementIndex>,
    first_children: Vec<ElementIndex>,
    last_children: Vec<ElementIndex>,
    siblings: Vec<ElementIndex>,
    /// Absolute positions; defined for index `i` only after `transform()`
    /// has run for `i` and all its ancestors.
    positions: Vec<Vec2>,
    capacity: usize,

    constraints: Vec<ElementConstraints>,
    constraint_capacity: usize,
}

impl ElementTree {
    /// Allocate all parallel arrays up front.  The capacities never change.
    pub fn with_capacity(element_capacity: usize, constraint_capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(element_capacity),
            parents: Vec::with_capacity(element_capacity),
            first_children: Vec::with_capacity(element_capacity),
            last_children: Vec::with_capacity(element_capacity),
            siblings: Vec::with_capacity(element_capacity),
            positions: Vec::with_capacity(element_capacity),
            capacity: element_capacity,
            constraints: Vec::with_capacity(constraint_capacity),
            constraint_capacity,
        }
    }

    /// Reset for a new tick.  O(1): prior-frame indices become invalid,
    /// nothing is deallocated.
    pub fn begin_ui(&mut self) {
        self.elements.clear();
        self.parents.clear();
        self.first_children.clear();
        self.last_children.clear();
        self.siblings.clear();
        self.positions.clear();
        self.constraints.clear();
    }

    /// Run layout then transform.  Call after the last `push_element` of
    /// the tick.
    pub fn end_ui(&mut self) {
        self.layout();
        self.transform();
    }

    /// Append an element and link it into `parent`'s child list.
    ///
    /// Children are chained singly via last-child + next-sibling, so a walk
    /// of `first_child`/`sibling` links reproduces exact push order.
    #[track_caller]
    pub fn push_element(
        &mut self,
        parent: ElementIndex,
        element: Element,
    ) -> Result<ElementIndex, TreeError> {
        if self.elements.len() == self.capacity {
            return Err(TreeError::TreeFull {
                capacity: self.capacity,
                location: Location::caller(),
            });
        }

        let result = ElementIndex::new(self.elements.len());
        self.elements.push(element);
        self.parents.push(parent);
        self.first_children.push(ElementIndex::NONE);
        self.last_children.push(ElementIndex::NONE);
        self.siblings.push(ElementIndex::NONE);
        self.positions.push(Vec2::ZERO);

        if parent.is_some() {
            let p = parent.index();
            if self.last_children[p].is_some() {
                self.siblings[self.last_children[p].index()] = result;
            }
            self.last_children[p] = result;
            if self.first_children[p].is_none() {
                self.first_children[p] = result;
            }
        }

        Ok(result)
    }

    /// Record external min/max extent bounds for `index`, applied during
    /// the layout pass.
    #[track_caller]
    pub fn push_constraints(
        &mut self,
        index: ElementIndex,
        min_extent: Vec2,
        max_extent: Vec2,
    ) -> Result<(), TreeError> {
        if self.constraints.len() == self.constraint_capacity {
            return Err(TreeError::ConstraintsFull {
                capacity: self.constraint_capacity,
                location: Location::caller(),
            });
        }
        self.constraints.push(ElementConstraints {
            index,
            min_extent,
            max_extent,
        });
        Ok(())
    }

    /// Convert parent-relative positions to absolute positions.
    ///
    /// Single pass in strictly increasing index order; correct because the
    /// preorder push invariant guarantees every parent index is smaller
    /// than its children's.  Idempotent: re-running without intervening
    /// pushes yields identical positions.
    pub fn transform(&mut self) {
        for i in 0..self.elements.len() {
            let parent_origin = match self.parents[i] {
                p if p.is_some() => self.positions[p.index()],
                _ => Vec2::ZERO,
            };
            self.positions[i] = parent_origin + self.elements[i].pos;
        }
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// O(1) element lookup.
    #[inline]
    pub fn get(&self, index: ElementIndex) -> &Element {
        &self.elements[index.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, index: ElementIndex) -> &mut Element {
        &mut self.elements[index.index()]
    }

    /// Absolute position of `index`.  Defined only after `transform()`.
    #[inline]
    pub fn position(&self, index: ElementIndex) -> Vec2 {
        self.positions[index.index()]
    }

    #[inline]
    pub fn parent(&self, index: ElementIndex) -> ElementIndex {
        self.parents[index.index()]
    }

    #[inline]
    pub fn first_child(&self, index: ElementIndex) -> ElementIndex {
        self.first_children[index.index()]
    }

    #[inline]
    pub fn next_sibling(&self, index: ElementIndex) -> ElementIndex {
        self.siblings[index.index()]
    }

    /// Walk `index`'s children in push order.
    pub fn children(&self, index: ElementIndex) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            next: self.first_children[index.index()],
        }
    }

    pub(crate) fn constraints(&self) -> &[ElementConstraints] {
        &self.constraints
    }

    // Raw-index accessors for the layout passes.

    #[inline]
    pub(crate) fn element_at(&self, i: usize) -> &Element {
        &self.elements[i]
    }

    #[inline]
    pub(crate) fn element_at_mut(&mut self, i: usize) -> &mut Element {
        &mut self.elements[i]
    }

    #[inline]
    pub(crate) fn first_child_at(&self, i: usize) -> ElementIndex {
        self.first_children[i]
    }

    #[inline]
    pub(crate) fn sibling_at(&self, i: usize) -> ElementIndex {
        self.siblings[i]
    }
}

/// Iterator over a parent's children via the sibling chain.
pub struct ChildIter<'a> {
    tree: &'a ElementTree,
    next: ElementIndex,
}

impl Iterator for ChildIter<'_> {
    type Item = ElementIndex;

    fn next(&mut self) -> Option<ElementIndex> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.siblings[current.index()];
        Some(current)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn elem() -> Element {
        Element::from_id(ElementId::here())
    }

    #[test]
    fn test_push_links_reproduce_push_order() {
        let mut tree = ElementTree::with_capacity(16, 4);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        let a = tree.push_element(root, elem()).unwrap();
        let b = tree.push_element(root, elem()).unwrap();
        let c = tree.push_element(root, elem()).unwrap();

        let walked: Vec<ElementIndex> = tree.children(root).collect();
        assert_eq!(walked, vec![a, b, c]);
    }

    #[test]
    fn test_first_child_none_iff_no_children() {
        let mut tree = ElementTree::with_capacity(8, 4);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        assert!(tree.first_child(root).is_none());

        let child = tree.push_element(root, elem()).unwrap();
        assert_eq!(tree.first_child(root), child);
        assert!(tree.first_child(child).is_none());
    }

    #[test]
    fn test_parent_index_less_than_child() {
        let mut tree = ElementTree::with_capacity(8, 4);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        let child = tree.push_element(root, elem()).unwrap();
        let grandchild = tree.push_element(child, elem()).unwrap();
        assert!(root.index() < child.index());
        assert!(child.index() < grandchild.index());
    }

    #[test]
    fn test_capacity_exceeded_is_error() {
        let mut tree = ElementTree::with_capacity(2, 0);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        tree.push_element(root, elem()).unwrap();
        let err = tree.push_element(root, elem()).unwrap_err();
        match err {
            TreeError::TreeFull { capacity, .. } => assert_eq!(capacity, 2),
            other => panic!("unexpected error: {other}"),
        }
        // No partial insertion.
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_capacity_error_carries_call_site() {
        let mut tree = ElementTree::with_capacity(0, 0);
        tree.begin_ui();
        let err = tree.push_element(ElementIndex::NONE, elem()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tree.rs"), "diagnostic should name the push site: {msg}");
    }

    #[test]
    fn test_begin_ui_resets_count() {
        let mut tree = ElementTree::with_capacity(4, 4);
        tree.begin_ui();
        tree.push_element(ElementIndex::NONE, elem()).unwrap();
        tree.push_element(ElementIndex::NONE, elem()).unwrap();
        assert_eq!(tree.len(), 2);

        tree.begin_ui();
        assert_eq!(tree.len(), 0);
        // Capacity survives the reset.
        assert_eq!(tree.capacity(), 4);
    }

    #[test]
    fn test_transform_adds_ancestor_positions() {
        let mut tree = ElementTree::with_capacity(8, 4);
        tree.begin_ui();
        let root = tree
            .push_element(ElementIndex::NONE, elem().with_pos(10.0, 20.0))
            .unwrap();
        let child = tree.push_element(root, elem().with_pos(1.0, 2.0)).unwrap();
        let grandchild = tree.push_element(child, elem().with_pos(0.5, 0.5)).unwrap();

        tree.transform();
        assert_eq!(tree.position(root), Vec2::new(10.0, 20.0));
        assert_eq!(tree.position(child), Vec2::new(11.0, 22.0));
        assert_eq!(tree.position(grandchild), Vec2::new(11.5, 22.5));
    }

    #[test]
    fn test_transform_idempotent() {
        let mut tree = ElementTree::with_capacity(8, 4);
        tree.begin_ui();
        let root = tree
            .push_element(ElementIndex::NONE, elem().with_pos(5.0, 5.0))
            .unwrap();
        let child = tree.push_element(root, elem().with_pos(3.0, 4.0)).unwrap();

        tree.transform();
        let first = (tree.position(root), tree.position(child));
        tree.transform();
        let second = (tree.position(root), tree.position(child));
        assert_eq!(first, second);
    }

    #[test]
    fn test_axis_flag_decode() {
        let e = Element::from_id(ElementId::NONE).with_auto_layout(Axis::Y, Axis::X);
        assert_eq!(e.major_axis(), Axis::Y);
        assert_eq!(e.minor_axis(), Axis::X);
        assert!(e.auto_layout());

        let plain = Element::from_id(ElementId::NONE);
        assert_eq!(plain.major_axis(), Axis::X);
        assert_eq!(plain.minor_axis(), Axis::X);
        assert!(!plain.auto_layout());
    }

    #[test]
    fn test_constraint_capacity_exceeded() {
        let mut tree = ElementTree::with_capacity(4, 1);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        tree.push_constraints(root, Vec2::ZERO, Vec2::new(100.0, 100.0))
            .unwrap();
        assert!(tree
            .push_constraints(root, Vec2::ZERO, Vec2::new(50.0, 50.0))
            .is_err());
    }

    #[test]
    fn test_multiple_roots() {
        let mut tree = ElementTree::with_capacity(4, 0);
        tree.begin_ui();
        let a = tree
            .push_element(ElementIndex::NONE, elem().with_pos(1.0, 1.0))
            .unwrap();
        let b = tree
            .push_element(ElementIndex::NONE, elem().with_pos(2.0, 2.0))
            .unwrap();
        tree.transform();
        assert_eq!(tree.position(a), Vec2::new(1.0, 1.0));
        assert_eq!(tree.position(b), Vec2::new(2.0, 2.0));
        assert!(tree.parent(a).is_none());
        assert!(tree.parent(b).is_none());
    }
}
