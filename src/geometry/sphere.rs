//! UV sphere geometry.

use super::{GeometryBuffers, MeshVertex};
use std::f32::consts::{PI, TAU};

/// Parameters for a UV sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 7.0,
            width_segments: 128,
            height_segments: 128,
        }
    }
}

/// Generate a UV sphere centered at the origin.
///
/// Pole rows emit a single triangle per quad, so the sphere has
/// `2 * w * (h - 1)` triangles.
pub fn sphere_geometry(params: &SphereParams) -> GeometryBuffers {
    let w = params.width_segments.max(3);
    let h = params.height_segments.max(2);

    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let theta = v * PI;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let phi = u * TAU;
            let normal = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(MeshVertex {
                position: [
                    normal[0] * params.radius,
                    normal[1] * params.radius,
                    normal[2] * params.radius,
                ],
                normal,
            });
        }
    }

    let row = w + 1;
    let mut indices = Vec::with_capacity((6 * w * h) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    GeometryBuffers { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let params = SphereParams {
            radius: 1.0,
            width_segments: 16,
            height_segments: 8,
        };
        let sphere = sphere_geometry(&params);
        assert_eq!(sphere.vertex_count(), 17 * 9);
        assert_eq!(sphere.triangle_count(), 2 * 16 * 7);
    }

    #[test]
    fn test_vertices_on_surface() {
        let params = SphereParams {
            radius: 7.0,
            width_segments: 12,
            height_segments: 6,
        };
        let sphere = sphere_geometry(&params);
        for v in &sphere.vertices {
            let p = v.position;
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 7.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_poles_at_top_and_bottom() {
        let sphere = sphere_geometry(&SphereParams::default());
        let top = sphere.vertices.first().map(|v| v.position[1]);
        let bottom = sphere.vertices.last().map(|v| v.position[1]);
        assert!((top.unwrap_or_default() - 7.0).abs() < 1e-4);
        assert!((bottom.unwrap_or_default() + 7.0).abs() < 1e-4);
    }
}
