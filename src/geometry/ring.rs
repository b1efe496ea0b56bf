//! Metal band geometry.
//!
//! A rectangle is swept around a circle in the XZ plane. Each station along
//! the sweep holds four corners in the order inner-bottom, outer-bottom,
//! outer-top, inner-top, and each segment band between two stations is
//! closed by four quads: bottom, outer, top, inner.

use super::{GeometryBuffers, MeshVertex};
use std::f32::consts::TAU;

/// Parameters for a metal ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    /// Distance from ring center to the middle of the band.
    pub radius: f32,
    /// Radial width of the cross-section.
    pub tube_width: f32,
    /// Vertical thickness of the cross-section.
    pub tube_height: f32,
    /// Number of segment bands around the circle.
    pub segments: u32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            radius: 8.2,
            tube_width: 0.3,
            tube_height: 0.2,
            segments: 128,
        }
    }
}

/// Generate a flat-faced ring.
///
/// Produces `4 * (segments + 1)` vertices and `8 * segments` triangles. The
/// last station sits at a full turn and coincides with station 0, so the
/// band is closed.
pub fn ring_geometry(params: &RingParams) -> GeometryBuffers {
    let segments = params.segments.max(3);
    let half_w = params.tube_width * 0.5;
    let half_h = params.tube_height * 0.5;

    let mut vertices = Vec::with_capacity(4 * (segments as usize + 1));
    for i in 0..=segments {
        // Exact wrap so the seam has no floating-point gap
        let angle = if i == segments {
            0.0
        } else {
            i as f32 / segments as f32 * TAU
        };
        let (rz, rx) = angle.sin_cos();
        let cx = rx * params.radius;
        let cz = rz * params.radius;

        let inner = [cx - rx * half_w, cz - rz * half_w];
        let outer = [cx + rx * half_w, cz + rz * half_w];

        // Corner normals blend the radial face with the top/bottom face
        let n_inner_bottom = normalize([-rx, -0.5, -rz]);
        let n_outer_bottom = normalize([rx, -0.5, rz]);
        let n_outer_top = normalize([rx, 0.5, rz]);
        let n_inner_top = normalize([-rx, 0.5, -rz]);

        vertices.push(MeshVertex {
            position: [inner[0], -half_h, inner[1]],
            normal: n_inner_bottom,
        });
        vertices.push(MeshVertex {
            position: [outer[0], -half_h, outer[1]],
            normal: n_outer_bottom,
        });
        vertices.push(MeshVertex {
            position: [outer[0], half_h, outer[1]],
            normal: n_outer_top,
        });
        vertices.push(MeshVertex {
            position: [inner[0], half_h, inner[1]],
            normal: n_inner_top,
        });
    }

    let mut indices = Vec::with_capacity(24 * segments as usize);
    for i in 0..segments {
        let curr = i * 4;
        let next = (i + 1) * 4;

        // Corner pairs (a -> b) for bottom, outer, top, inner faces
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            indices.extend_from_slice(&[curr + a, next + a, next + b]);
            indices.extend_from_slice(&[curr + a, next + b, curr + b]);
        }
    }

    GeometryBuffers { vertices, indices }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
