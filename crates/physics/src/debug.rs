//! # Debug Geometry
//!
//! Wireframe output of rapier's debug-render pipeline, flattened into two
//! numeric arrays: vertex positions (stride 3) and per-vertex RGBA colors
//! (stride 4). Every line segment contributes two vertices.

use rapier3d::prelude::{DebugColor, DebugRenderBackend, DebugRenderObject, Point, Real};

pub const POSITION_STRIDE: usize = 3;
pub const COLOR_STRIDE: usize = 4;

/// Flat debug-line buffers, regenerated on every
/// [`PhysicsWorld::debug_render`](crate::PhysicsWorld::debug_render) call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugRenderBuffers {
    pub vertices: Vec<f32>,
    pub colors: Vec<f32>,
}

impl DebugRenderBuffers {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / POSITION_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push_vertex(&mut self, p: &Point<Real>, rgba: [f32; 4]) {
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        self.colors.extend_from_slice(&rgba);
    }
}

impl DebugRenderBackend for DebugRenderBuffers {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: DebugColor,
    ) {
        let rgba = hsla_to_rgba(color);
        self.push_vertex(&a, rgba);
        self.push_vertex(&b, rgba);
    }
}

/// Rapier reports debug colors as HSLA with hue in degrees.
#[must_use]
pub fn hsla_to_rgba([hue, saturation, lightness, alpha]: [f32; 4]) -> [f32; 4] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = if sector < 1.0 {
        (chroma, second, 0.0)
    } else if sector < 2.0 {
        (second, chroma, 0.0)
    } else if sector < 3.0 {
        (0.0, chroma, second)
    } else if sector < 4.0 {
        (0.0, second, chroma)
    } else if sector < 5.0 {
        (second, 0.0, chroma)
    } else {
        (chroma, 0.0, second)
    };
    let offset = lightness - chroma / 2.0;
    [r + offset, g + offset, b + offset, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn primary_hues() {
        assert!(close(hsla_to_rgba([0.0, 1.0, 0.5, 1.0]), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsla_to_rgba([120.0, 1.0, 0.5, 1.0]), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsla_to_rgba([240.0, 1.0, 0.5, 0.5]), [0.0, 0.0, 1.0, 0.5]));
    }

    #[test]
    fn secondary_hues_and_wraparound() {
        assert!(close(hsla_to_rgba([60.0, 1.0, 0.5, 1.0]), [1.0, 1.0, 0.0, 1.0]));
        assert!(close(hsla_to_rgba([180.0, 1.0, 0.5, 1.0]), [0.0, 1.0, 1.0, 1.0]));
        assert!(close(hsla_to_rgba([300.0, 1.0, 0.5, 1.0]), [1.0, 0.0, 1.0, 1.0]));
        assert!(close(hsla_to_rgba([360.0, 1.0, 0.5, 1.0]), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsla_to_rgba([-120.0, 1.0, 0.5, 1.0]), [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert!(close(hsla_to_rgba([200.0, 0.0, 0.3, 1.0]), [0.3, 0.3, 0.3, 1.0]));
    }

    #[test]
    fn each_line_adds_two_vertices() {
        let mut buffers = DebugRenderBuffers::default();
        buffers.push_vertex(&Point::new(1.0, 2.0, 3.0), [1.0, 0.0, 0.0, 1.0]);
        buffers.push_vertex(&Point::new(4.0, 5.0, 6.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(buffers.vertices, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buffers.colors.len(), 2 * COLOR_STRIDE);
        assert_eq!(buffers.vertex_count(), 2);
    }
}
