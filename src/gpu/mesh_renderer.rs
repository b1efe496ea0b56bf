//! Mesh scene renderer.
//!
//! Nodes are drawn as instanced screen-facing quads (a 4-vertex strip per
//! node) and connections as a line list. Both passes alpha-blend over a
//! transparent layer with no depth buffer.

use super::layouts::create_mesh_layout;
use super::pipelines::{
    create_pipeline_layout, line_vertex_layout, node_instance_layout, RenderPipelineBuilder,
};
use super::textures::LayerTargets;
use super::{GpuContext, GpuError};
use crate::scene::{LineVertex, MeshScene, Viewport};
use std::sync::Arc;
use wgpu::{BindGroup, Buffer, Device, PrimitiveTopology, Queue, RenderPipeline};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshUniforms {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
    // node alpha, line alpha, node size, unused
    params: [f32; 4],
    viewport: [f32; 4],
}

/// Offscreen renderer for [`MeshScene`].
pub struct MeshRenderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    node_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    uniforms: Buffer,
    bind_group: BindGroup,
    nodes: Buffer,
    node_capacity: usize,
    lines: Buffer,
    line_capacity: usize,
    targets: LayerTargets,
}

impl MeshRenderer {
    pub fn new(ctx: &GpuContext, scene: &MeshScene, viewport: Viewport) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let layout = create_mesh_layout(&device);
        let pipeline_layout = create_pipeline_layout(&device, "mesh_pipeline_layout", &[&layout]);

        let node_pipeline = RenderPipelineBuilder::new("mesh_node_pipeline")
            .entry_points("vs_node", "fs_node")
            .vertex_buffer(node_instance_layout())
            .topology(PrimitiveTopology::TriangleStrip)
            .build(&device, &pipeline_layout, &shader);

        let line_pipeline = RenderPipelineBuilder::new("mesh_line_pipeline")
            .entry_points("vs_line", "fs_line")
            .vertex_buffer(line_vertex_layout())
            .topology(PrimitiveTopology::LineList)
            .build(&device, &pipeline_layout, &shader);

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_uniforms"),
            size: std::mem::size_of::<MeshUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bind_group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let node_capacity = scene.nodes().len().max(1);
        let nodes = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_node_instances"),
            size: (std::mem::size_of::<[f32; 3]>() * node_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_capacity = scene.lines().capacity().max(1);
        let lines = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_line_vertices"),
            size: (std::mem::size_of::<LineVertex>() * 2 * line_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (width, height) = viewport.physical_size();
        let targets = LayerTargets::new(&device, "mesh_layer", width, height, 1, false);

        Self {
            device,
            queue,
            node_pipeline,
            line_pipeline,
            uniforms,
            bind_group,
            nodes,
            node_capacity,
            lines,
            line_capacity,
            targets,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.targets.size()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        if (width, height) == self.targets.size() {
            return;
        }
        self.targets.destroy();
        self.targets = LayerTargets::new(&self.device, "mesh_layer", width, height, 1, false);
    }

    /// Upload node and line data, draw, and copy into the readback buffer.
    pub fn render(&self, scene: &MeshScene) {
        let (width, height) = self.targets.size();
        let palette = scene.palette();
        let uniforms = MeshUniforms {
            view_proj: scene.camera().view_projection().to_cols_array_2d(),
            color: [palette.color[0], palette.color[1], palette.color[2], 1.0],
            params: [
                palette.node_alpha,
                palette.line_alpha,
                scene.params().node_size,
                0.0,
            ],
            viewport: [width as f32, height as f32, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));

        let node_count = scene.positions().len().min(self.node_capacity);
        if node_count > 0 {
            self.queue.write_buffer(
                &self.nodes,
                0,
                bytemuck::cast_slice(&scene.positions()[..node_count]),
            );
        }

        let line_count = scene.line_count().min(self.line_capacity);
        if line_count > 0 {
            self.queue.write_buffer(
                &self.lines,
                0,
                bytemuck::cast_slice(&scene.lines().vertices()[..line_count * 2]),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mesh_render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh_render_pass"),
                color_attachments: &[Some(self.targets.color_attachment())],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            render_pass.set_bind_group(0, &self.bind_group, &[]);

            if line_count > 0 {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.lines.slice(..));
                render_pass.draw(0..(line_count * 2) as u32, 0..1);
            }

            if node_count > 0 {
                render_pass.set_pipeline(&self.node_pipeline);
                render_pass.set_vertex_buffer(0, self.nodes.slice(..));
                render_pass.draw(0..4, 0..node_count as u32);
            }
        }

        self.targets.readback.copy_from(&mut encoder, &self.targets.output);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Premultiplied RGBA8 pixels of the last rendered frame.
    pub fn read_pixels(&self) -> Result<Vec<u8>, GpuError> {
        self.targets.readback.read_pixels(&self.device)
    }

    pub fn destroy(&self) {
        self.uniforms.destroy();
        self.nodes.destroy();
        self.lines.destroy();
        self.targets.destroy();
    }
}
