//! Two-pass auto-layout solver.
//!
//! Pass 1 walks indices in reverse (children before parents) and derives
//! each auto-layout element's extent from its children: sum along the major
//! axis, max along the minor axis, plus the element's own padding, then
//! clamps against any external [`ElementConstraints`] for that index.
//!
//! Pass 2 walks indices forward (parents before children) and places the
//! children of auto-layout parents: sibling extents accumulate along the
//! major axis starting at the leading padding inset, and each child is
//! offset along the minor axis by its alignment factor times the remaining
//! slack inside the parent's content rectangle.
//!
//! Axis selection is decoded from the packed flag bits into [`Axis`] once
//! per element, at the top of each pass — never inline at the use sites.
//!
//! [`ElementConstraints`]: crate::tree::ElementConstraints
//! [`Axis`]: crate::tree::Axis

use crate::tree::ElementTree;

impl ElementTree {
    /// Run both layout passes.  Relative positions of auto-laid-out
    /// children are overwritten; everything else is left as pushed.
    pub fn layout(&mut self) {
        self.size_pass();
        self.placement_pass();
    }

    /// Pass 1: extents, children before parents (reverse index order).
    fn size_pass(&mut self) {
        for i in (0..self.len()).rev() {
            let element = *self.element_at(i);

            if element.auto_layout() && self.first_child_at(i).is_some() {
                let major = element.major_axis();
                let minor = element.minor_axis();

                let mut major_sum = 0.0;
                let mut minor_max: f32 = 0.0;
                let mut child = self.first_child_at(i);
                while child.is_some() {
                    let extent = self.element_at(child.index()).extent;
                    major_sum += extent.axis(major);
                    minor_max = minor_max.max(extent.axis(minor));
                    child = self.sibling_at(child.index());
                }

                let mut extent = element.extent;
                extent.set_axis(major, major_sum + element.padding.sum(major));
                if minor != major {
                    extent.set_axis(minor, minor_max + element.padding.sum(minor));
                }
                self.element_at_mut(i).extent = extent;
            }

            // External bounds clamp, applied to every element with a
            // matching constraint entry.
            for k in 0..self.constraints().len() {
                let constraint = self.constraints()[k];
                if constraint.index.is_some() && constraint.index.index() == i {
                    let clamped = self
                        .element_at(i)
                        .extent
                        .clamp(constraint.min_extent, constraint.max_extent);
                    self.element_at_mut(i).extent = clamped;
                }
            }
        }
    }

    /// Pass 2: placement, parents before children (forward index order).
    fn placement_pass(&mut self) {
        for i in 0..self.len() {
            let parent = *self.element_at(i);
            if !parent.auto_layout() || self.first_child_at(i).is_none() {
                continue;
            }

            let major = parent.major_axis();
            let minor = parent.minor_axis();
            let leading_minor = parent.padding.leading(minor);
            let content_minor = parent.extent.axis(minor) - parent.padding.sum(minor);

            let mut cursor = parent.padding.leading(major);
            let mut child = self.first_child_at(i);
            while child.is_some() {
                let ci = child.index();
                let child_elem = *self.element_at(ci);

                let mut pos = child_elem.pos;
                pos.set_axis(major, cursor);
                cursor += child_elem.extent.axis(major);

                // Degenerate flag words can select the same axis twice; the
                // major-axis accumulation wins in that case.
                if minor != major {
                    let slack = content_minor - child_elem.extent.axis(minor);
                    pos.set_axis(minor, leading_minor + child_elem.alignment.axis(minor) * slack);
                }

                self.element_at_mut(ci).pos = pos;
                child = self.sibling_at(ci);
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use crate::id::ElementId;
    use crate::math::Vec2;
    use crate::tree::{Axis, Element, ElementIndex, ElementTree, Padding};

    fn elem() -> Element {
        Element::from_id(ElementId::here())
    }

    #[test]
    fn test_row_extent_is_sum_major_max_minor() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let row = tree
            .push_element(ElementIndex::NONE, elem().with_auto_layout(Axis::X, Axis::Y))
            .unwrap();
        tree.push_element(row, elem().with_extent(30.0, 10.0)).unwrap();
        tree.push_element(row, elem().with_extent(50.0, 20.0)).unwrap();

        tree.layout();
        assert_eq!(tree.get(row).extent, Vec2::new(80.0, 20.0));
    }

    #[test]
    fn test_column_extent_is_sum_major_max_minor() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let column = tree
            .push_element(ElementIndex::NONE, elem().with_auto_layout(Axis::Y, Axis::X))
            .unwrap();
        tree.push_element(column, elem().with_extent(30.0, 10.0)).unwrap();
        tree.push_element(column, elem().with_extent(50.0, 20.0)).unwrap();

        tree.layout();
        assert_eq!(tree.get(column).extent, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_padding_grows_extent_and_offsets_children() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let row = tree
            .push_element(
                ElementIndex::NONE,
                elem()
                    .with_auto_layout(Axis::X, Axis::Y)
                    .with_padding(Padding::all(5.0)),
            )
            .unwrap();
        let a = tree.push_element(row, elem().with_extent(30.0, 10.0)).unwrap();
        let b = tree.push_element(row, elem().with_extent(50.0, 20.0)).unwrap();

        tree.layout();
        assert_eq!(tree.get(row).extent, Vec2::new(90.0, 30.0));
        assert_eq!(tree.get(a).pos.x, 5.0);
        assert_eq!(tree.get(b).pos.x, 35.0);
        // Alignment 0 pins children to the leading (bottom) inset.
        assert_eq!(tree.get(a).pos.y, 5.0);
        assert_eq!(tree.get(b).pos.y, 5.0);
    }

    #[test]
    fn test_minor_axis_alignment() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let row = tree
            .push_element(
                ElementIndex::NONE,
                elem().with_auto_layout(Axis::X, Axis::Y).with_extent(0.0, 0.0),
            )
            .unwrap();
        let start = tree
            .push_element(row, elem().with_extent(10.0, 10.0).with_alignment(0.0, 0.0))
            .unwrap();
        let center = tree
            .push_element(row, elem().with_extent(10.0, 10.0).with_alignment(0.0, 0.5))
            .unwrap();
        let end = tree
            .push_element(row, elem().with_extent(10.0, 10.0).with_alignment(0.0, 1.0))
            .unwrap();
        // A taller sibling defines the row's minor extent.
        tree.push_element(row, elem().with_extent(10.0, 30.0)).unwrap();

        tree.layout();
        assert_eq!(tree.get(row).extent.y, 30.0);
        assert_eq!(tree.get(start).pos.y, 0.0);
        assert_eq!(tree.get(center).pos.y, 10.0);
        assert_eq!(tree.get(end).pos.y, 20.0);
    }

    #[test]
    fn test_constraints_clamp_extent() {
        let mut tree = ElementTree::with_capacity(8, 2);
        tree.begin_ui();
        let row = tree
            .push_element(ElementIndex::NONE, elem().with_auto_layout(Axis::X, Axis::Y))
            .unwrap();
        tree.push_element(row, elem().with_extent(300.0, 40.0)).unwrap();
        tree.push_constraints(row, Vec2::new(0.0, 50.0), Vec2::new(200.0, 100.0))
            .unwrap();

        tree.layout();
        // Width clamped down to the max, height clamped up to the min.
        assert_eq!(tree.get(row).extent, Vec2::new(200.0, 50.0));
    }

    #[test]
    fn test_non_auto_parent_leaves_children_untouched() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let root = tree
            .push_element(ElementIndex::NONE, elem().with_extent(100.0, 100.0))
            .unwrap();
        let child = tree
            .push_element(root, elem().with_extent(20.0, 20.0).with_pos(7.0, 9.0))
            .unwrap();

        tree.layout();
        assert_eq!(tree.get(child).pos, Vec2::new(7.0, 9.0));
        assert_eq!(tree.get(root).extent, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_nested_auto_layout_sizes_bottom_up() {
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let outer = tree
            .push_element(ElementIndex::NONE, elem().with_auto_layout(Axis::Y, Axis::X))
            .unwrap();
        let inner = tree
            .push_element(outer, elem().with_auto_layout(Axis::X, Axis::Y))
            .unwrap();
        tree.push_element(inner, elem().with_extent(25.0, 15.0)).unwrap();
        tree.push_element(inner, elem().with_extent(25.0, 10.0)).unwrap();
        tree.push_element(outer, elem().with_extent(40.0, 8.0)).unwrap();

        tree.layout();
        // Inner row resolved first (reverse order), then the outer column
        // sums the resolved heights.
        assert_eq!(tree.get(inner).extent, Vec2::new(50.0, 15.0));
        assert_eq!(tree.get(outer).extent, Vec2::new(50.0, 23.0));
    }

    #[test]
    fn test_root_child_scenario_absolute_origin() {
        // Root with no parent, one child with extent (32, 128) and zero
        // relative position: the child's absolute position is the origin.
        let mut tree = ElementTree::with_capacity(8, 0);
        tree.begin_ui();
        let root = tree.push_element(ElementIndex::NONE, elem()).unwrap();
        let child = tree
            .push_element(root, elem().with_extent(32.0, 128.0))
            .unwrap();
        tree.end_ui();

        assert_eq!(tree.position(child), Vec2::ZERO);
        assert_eq!(tree.get(child).extent, Vec2::new(32.0, 128.0));
    }
}
