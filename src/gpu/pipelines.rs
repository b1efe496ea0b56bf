//! Render pipeline construction for the hero layers.
//!
//! Every layer pipeline writes premultiplied color into a [`LAYER_FORMAT`]
//! target; the builder only varies what differs between the planet and mesh
//! passes.

use super::textures::LAYER_FORMAT;
use wgpu::{
    BindGroupLayout, Device, PipelineLayout, PrimitiveTopology, RenderPipeline, ShaderModule,
    TextureFormat, VertexBufferLayout,
};

/// Depth format used by the planet pass.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Builder for layer render pipelines.
pub struct RenderPipelineBuilder {
    label: &'static str,
    vertex_entry: &'static str,
    fragment_entry: &'static str,
    buffers: Vec<VertexBufferLayout<'static>>,
    target: wgpu::ColorTargetState,
    topology: PrimitiveTopology,
    depth: Option<wgpu::DepthStencilState>,
    samples: u32,
}

impl RenderPipelineBuilder {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            buffers: Vec::new(),
            target: wgpu::ColorTargetState {
                format: LAYER_FORMAT,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            },
            topology: PrimitiveTopology::TriangleList,
            depth: None,
            samples: 1,
        }
    }

    /// Set custom entry points.
    pub fn entry_points(mut self, vertex: &'static str, fragment: &'static str) -> Self {
        self.vertex_entry = vertex;
        self.fragment_entry = fragment;
        self
    }

    pub fn vertex_buffer(mut self, layout: VertexBufferLayout<'static>) -> Self {
        self.buffers.push(layout);
        self
    }

    pub fn blend(mut self, blend: Option<wgpu::BlendState>) -> Self {
        self.target.blend = blend;
        self
    }

    pub fn topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Depth-test against [`DEPTH_FORMAT`], optionally writing depth.
    pub fn depth_tested(mut self, write: bool) -> Self {
        self.depth = Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });
        self
    }

    pub fn sample_count(mut self, count: u32) -> Self {
        self.samples = count.max(1);
        self
    }

    pub fn build(self, device: &Device, layout: &PipelineLayout, shader: &ShaderModule) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(self.vertex_entry),
                buffers: &self.buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(self.fragment_entry),
                targets: &[Some(self.target)],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                ..Default::default()
            },
            depth_stencil: self.depth,
            multisample: wgpu::MultisampleState {
                count: self.samples,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        })
    }
}

/// Create a pipeline layout from bind group layouts.
pub fn create_pipeline_layout(
    device: &Device,
    label: &'static str,
    layouts: &[&BindGroupLayout],
) -> PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: layouts,
        immediate_size: 0,
    })
}

const MESH_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const NODE_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const LINE_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

/// [`crate::geometry::MeshVertex`]: position, normal.
pub fn mesh_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<crate::geometry::MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_VERTEX_ATTRIBUTES,
    }
}

/// One node center per instance.
pub fn node_instance_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<glam::Vec3>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &NODE_INSTANCE_ATTRIBUTES,
    }
}

/// [`crate::scene::LineVertex`]: position, alpha.
pub fn line_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<crate::scene::LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_VERTEX_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuContext;

    #[test]
    fn test_vertex_strides() {
        assert_eq!(mesh_vertex_layout().array_stride, 24);
        assert_eq!(node_instance_layout().array_stride, 12);
        assert_eq!(line_vertex_layout().array_stride, 16);
    }

    #[test]
    fn test_builder_defaults_to_premultiplied_layer() {
        let builder = RenderPipelineBuilder::new("test").depth_tested(true).sample_count(0);
        assert_eq!(builder.target.format, LAYER_FORMAT);
        assert_eq!(
            builder.target.blend,
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING)
        );
        assert_eq!(builder.samples, 1);
        assert!(builder.depth.map(|d| d.depth_write_enabled).unwrap_or(false));
    }

    #[tokio::test]
    async fn test_pipeline_layout_creation() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };

        let bind_group_layout = crate::gpu::layouts::create_mesh_layout(&ctx.device);
        let _layout = create_pipeline_layout(&ctx.device, "test_layout", &[&bind_group_layout]);
    }
}
