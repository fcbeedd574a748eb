//! Vertex data types and emission helpers.
//!
//! Coordinates are bottom-left-origin, Y up, matching the orthographic
//! projection produced by [`ortho_projection`].

use bytemuck::{Pod, Zeroable};
use trellis_ui::Vec2;

/// Interleaved rect vertex: 2 position floats + 4 color floats, 24-byte
/// stride. Attribute 0 reads the position at offset 0, attribute 1 the
/// color at offset 8.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RectVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

pub const VERTEX_STRIDE: usize = std::mem::size_of::<RectVertex>();
pub const POSITION_OFFSET: usize = 0;
pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

/// Six vertices (two CCW triangles) covering the rectangle at `pos`
/// with `extent`, all in `color`.
pub fn rectangle_vertices(pos: Vec2, extent: Vec2, color: [f32; 4]) -> [RectVertex; 6] {
    let v = |x: f32, y: f32| RectVertex {
        position: [x, y],
        color,
    };
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + extent.x, pos.y + extent.y);
    [
        v(x0, y0),
        v(x1, y0),
        v(x1, y1),
        v(x1, y1),
        v(x0, y1),
        v(x0, y0),
    ]
}

/// Column-major orthographic projection mapping `[0, width] x [0, height]`
/// (origin bottom-left, Y up) onto clip space, depth passed through.
pub fn ortho_projection(width: f32, height: f32) -> [[f32; 4]; 4] {
    [
        [2.0 / width, 0.0, 0.0, 0.0],
        [0.0, 2.0 / height, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, -1.0, 0.0, 1.0],
    ]
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(VERTEX_STRIDE, 24);
        assert_eq!(COLOR_OFFSET, 8);
    }

    #[test]
    fn test_rectangle_corners_and_winding() {
        let color = [0.2, 0.4, 0.6, 1.0];
        let verts = rectangle_vertices(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), color);
        assert_eq!(verts[0].position, [10.0, 20.0]);
        assert_eq!(verts[1].position, [40.0, 20.0]);
        assert_eq!(verts[2].position, [40.0, 60.0]);
        // Second triangle shares the diagonal.
        assert_eq!(verts[3].position, verts[2].position);
        assert_eq!(verts[4].position, [10.0, 60.0]);
        assert_eq!(verts[5].position, verts[0].position);
        assert!(verts.iter().all(|v| v.color == color));
    }

    #[test]
    fn test_cast_to_bytes() {
        let verts = rectangle_vertices(Vec2::ZERO, Vec2::new(1.0, 1.0), [0.0; 4]);
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 6 * VERTEX_STRIDE);
    }

    #[test]
    fn test_ortho_maps_viewport_corners_to_clip_corners() {
        let m = ortho_projection(800.0, 600.0);
        let project = |x: f32, y: f32| {
            [
                m[0][0] * x + m[1][0] * y + m[3][0],
                m[0][1] * x + m[1][1] * y + m[3][1],
            ]
        };
        assert_eq!(project(0.0, 0.0), [-1.0, -1.0]);
        assert_eq!(project(800.0, 600.0), [1.0, 1.0]);
        assert_eq!(project(400.0, 300.0), [0.0, 0.0]);
    }
}
