//! Procedural geometry for the hero scenes.
//!
//! Provides:
//! - Flat-faced metal ring: rectangular cross-section swept around a circle
//! - UV sphere with outward normals

mod ring;
mod sphere;

pub use ring::{ring_geometry, RingParams};
pub use sphere::{sphere_geometry, SphereParams};

/// Vertex data for lit meshes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuffers {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl GeometryBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Size in bytes of the vertex and index data once uploaded.
    pub fn byte_size(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice()) + std::mem::size_of_val(self.indices.as_slice())
    }
}
