//! Absolute-bounds hit testing.
//!
//! Bounds are only meaningful after the transform pass has produced
//! absolute positions for the tick.

use crate::math::Vec2;
use crate::tree::{ElementIndex, ElementTree};

/// Axis-aligned bounding box stored as min/max corners (16 bytes).
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    /// Create from origin + extent.
    #[inline(always)]
    pub fn from_rect(origin: Vec2, extent: Vec2) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + extent.x,
            max_y: origin.y + extent.y,
        }
    }

    /// Point-in-AABB test.  Four comparisons, edges inclusive.
    #[inline(always)]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.min_x && px <= self.max_x && py >= self.min_y && py <= self.max_y
    }
}

impl ElementTree {
    /// Absolute bounds of `index`.  Valid only after `transform()`.
    pub fn bounds(&self, index: ElementIndex) -> Aabb {
        Aabb::from_rect(self.position(index), self.get(index).extent)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ElementId;
    use crate::tree::Element;

    #[test]
    fn test_contains_inside_and_out() {
        let aabb = Aabb::from_rect(Vec2::ZERO, Vec2::new(32.0, 128.0));
        assert!(aabb.contains(16.0, 64.0));
        assert!(!aabb.contains(40.0, 64.0));
        // Edges are inclusive.
        assert!(aabb.contains(0.0, 0.0));
        assert!(aabb.contains(32.0, 128.0));
    }

    #[test]
    fn test_tree_bounds_use_absolute_position() {
        let mut tree = ElementTree::with_capacity(4, 0);
        tree.begin_ui();
        let root = tree
            .push_element(
                ElementIndex::NONE,
                Element::from_id(ElementId::here()).with_pos(100.0, 50.0),
            )
            .unwrap();
        let child = tree
            .push_element(
                root,
                Element::from_id(ElementId::here())
                    .with_pos(10.0, 10.0)
                    .with_extent(20.0, 20.0),
            )
            .unwrap();
        tree.end_ui();

        let bounds = tree.bounds(child);
        assert_eq!(bounds.min_x, 110.0);
        assert_eq!(bounds.min_y, 60.0);
        assert!(bounds.contains(125.0, 75.0));
        assert!(!bounds.contains(95.0, 55.0));
    }
}
