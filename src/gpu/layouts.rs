//! Bind group layouts for the planet and mesh pipelines.
//!
//! Bindings are numbered in the order entries are added, matching the
//! `@binding` indices in the WGSL sources.

use wgpu::{BindGroupLayout, BindGroupLayoutEntry, BindingType, Device, ShaderStages};

/// Accumulates sequentially numbered bind group layout entries.
pub struct BindGroupLayoutBuilder {
    label: &'static str,
    stages: ShaderStages,
    entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    /// Start a layout whose entries are visible to both shader stages.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            stages: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            entries: Vec::new(),
        }
    }

    /// Visibility for entries added after this call.
    pub fn stages(mut self, stages: ShaderStages) -> Self {
        self.stages = stages;
        self
    }

    pub fn uniform(self) -> Self {
        self.push(BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        })
    }

    /// Filterable 2D float texture.
    pub fn texture(self) -> Self {
        self.push(BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        })
    }

    pub fn sampler(self) -> Self {
        self.push(BindingType::Sampler(wgpu::SamplerBindingType::Filtering))
    }

    pub fn entries(&self) -> &[BindGroupLayoutEntry] {
        &self.entries
    }

    pub fn build(self, device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(self.label),
            entries: &self.entries,
        })
    }

    fn push(mut self, ty: BindingType) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding: self.entries.len() as u32,
            visibility: self.stages,
            ty,
            count: None,
        });
        self
    }
}

fn planet_scene_entries() -> BindGroupLayoutBuilder {
    BindGroupLayoutBuilder::new("planet_scene_layout").uniform()
}

fn planet_object_entries() -> BindGroupLayoutBuilder {
    BindGroupLayoutBuilder::new("planet_object_layout")
        .uniform()
        .stages(ShaderStages::FRAGMENT)
        .texture()
        .sampler()
}

fn mesh_entries() -> BindGroupLayoutBuilder {
    BindGroupLayoutBuilder::new("mesh_layout").uniform()
}

/// Group 0: camera and lights shared by every planet draw.
pub fn create_planet_scene_layout(device: &Device) -> BindGroupLayout {
    planet_scene_entries().build(device)
}

/// Group 1: object uniforms, environment map and its sampler.
pub fn create_planet_object_layout(device: &Device) -> BindGroupLayout {
    planet_object_entries().build(device)
}

/// Mesh uniforms read by both the node and line passes.
pub fn create_mesh_layout(device: &Device) -> BindGroupLayout {
    mesh_entries().build(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuContext;

    #[test]
    fn test_object_layout_bindings() {
        let builder = planet_object_entries();
        let entries = builder.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.binding).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(entries[0].visibility.contains(ShaderStages::VERTEX));
        assert_eq!(entries[1].visibility, ShaderStages::FRAGMENT);
        assert!(matches!(entries[2].ty, BindingType::Sampler(_)));
    }

    #[test]
    fn test_single_uniform_layouts() {
        assert_eq!(planet_scene_entries().entries().len(), 1);
        assert_eq!(mesh_entries().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_layouts_build_on_device() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return, // Skip if no GPU
        };

        let _scene = create_planet_scene_layout(&ctx.device);
        let _object = create_planet_object_layout(&ctx.device);
        let _mesh = create_mesh_layout(&ctx.device);
    }
}
