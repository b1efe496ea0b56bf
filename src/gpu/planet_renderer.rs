//! Planet scene renderer.
//!
//! Draws the sphere and both rings into an offscreen layer with depth
//! testing, multisampled when the scene asks for antialiasing.

use super::layouts::{create_planet_object_layout, create_planet_scene_layout};
use super::pipelines::{create_pipeline_layout, mesh_vertex_layout, RenderPipelineBuilder};
use super::textures::{LayerTargets, RenderTarget, LAYER_FORMAT};
use super::{GpuContext, GpuError};
use crate::geometry::GeometryBuffers;
use crate::scene::{PlanetScene, Viewport};
use glam::Mat4;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline};

/// MSAA sample count used when antialiasing is requested.
pub const PLANET_MSAA_SAMPLES: u32 = 4;

const PLANET_SHADER: &str = include_str!("shaders/planet.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_dirs: [[f32; 4]; 4],
    light_colors: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    base: [f32; 4],
    secondary: [f32; 4],
    glow: [f32; 4],
    params: [f32; 4],
}

struct MeshBuffers {
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(device: &Device, label: &str, geometry: &GeometryBuffers) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: geometry.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertices.destroy();
        self.indices.destroy();
    }
}

struct ObjectBinding {
    uniforms: Buffer,
    bind_group: BindGroup,
}

/// Offscreen renderer for [`PlanetScene`].
pub struct PlanetRenderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    sphere_pipeline: RenderPipeline,
    ring_pipeline: RenderPipeline,
    scene_uniforms: Buffer,
    scene_bind_group: BindGroup,
    sphere: MeshBuffers,
    ring: MeshBuffers,
    sphere_binding: ObjectBinding,
    ring_bindings: Vec<ObjectBinding>,
    env_map: RenderTarget,
    targets: LayerTargets,
}

impl PlanetRenderer {
    /// Upload static scene data and allocate targets for `viewport`.
    pub fn new(ctx: &GpuContext, scene: &PlanetScene, viewport: Viewport) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let sample_count = if scene.params().antialias {
            ctx.msaa_samples(LAYER_FORMAT, PLANET_MSAA_SAMPLES)
        } else {
            1
        };

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("planet_shader"),
            source: wgpu::ShaderSource::Wgsl(PLANET_SHADER.into()),
        });

        let scene_layout = create_planet_scene_layout(&device);
        let object_layout = create_planet_object_layout(&device);
        let pipeline_layout =
            create_pipeline_layout(&device, "planet_pipeline_layout", &[&scene_layout, &object_layout]);

        let sphere_pipeline = RenderPipelineBuilder::new("planet_sphere_pipeline")
            .entry_points("vs_main", "fs_sphere")
            .vertex_buffer(mesh_vertex_layout())
            .depth_tested(true)
            .sample_count(sample_count)
            .build(&device, &pipeline_layout, &shader);

        let ring_pipeline = RenderPipelineBuilder::new("planet_ring_pipeline")
            .entry_points("vs_main", "fs_ring")
            .vertex_buffer(mesh_vertex_layout())
            .depth_tested(true)
            .sample_count(sample_count)
            .build(&device, &pipeline_layout, &shader);

        let scene_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("planet_scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planet_scene_bind_group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniforms.as_entire_binding(),
            }],
        });

        let env_map = RenderTarget::upload(&device, &queue, "planet_env_map", scene.env_map().image());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("planet_env_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_object = |label: &str| {
            let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<ObjectUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &object_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(env_map.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            ObjectBinding {
                uniforms,
                bind_group,
            }
        };

        let sphere_binding = bind_object("planet_sphere_object");
        let ring_bindings = (0..scene.rings().len())
            .map(|_| bind_object("planet_ring_object"))
            .collect();

        let sphere = MeshBuffers::upload(&device, "planet_sphere_mesh", scene.sphere());
        let ring = match scene.rings().first() {
            Some(ring) => MeshBuffers::upload(&device, "planet_ring_mesh", &ring.geometry),
            None => MeshBuffers::upload(&device, "planet_ring_mesh", &GeometryBuffers::default()),
        };

        let (width, height) = viewport.physical_size();
        let targets = LayerTargets::new(&device, "planet_layer", width, height, sample_count, true);

        Self {
            device,
            queue,
            sphere_pipeline,
            ring_pipeline,
            scene_uniforms,
            scene_bind_group,
            sphere,
            ring,
            sphere_binding,
            ring_bindings,
            env_map,
            targets,
        }
    }

    /// Physical size of the layer.
    pub fn size(&self) -> (u32, u32) {
        self.targets.size()
    }

    pub fn sample_count(&self) -> u32 {
        self.targets.sample_count()
    }

    /// Reallocate targets for a new container size.
    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        if (width, height) == self.targets.size() {
            return;
        }
        self.targets.destroy();
        self.targets = LayerTargets::new(
            &self.device,
            "planet_layer",
            width,
            height,
            self.targets.sample_count(),
            true,
        );
    }

    /// Draw the scene and copy the layer into the readback buffer.
    pub fn render(&self, scene: &PlanetScene) {
        self.write_uniforms(scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planet_render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("planet_render_pass"),
                color_attachments: &[Some(self.targets.color_attachment())],
                depth_stencil_attachment: self.targets.depth_attachment(),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            render_pass.set_pipeline(&self.sphere_pipeline);
            render_pass.set_bind_group(1, &self.sphere_binding.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.sphere.vertices.slice(..));
            render_pass.set_index_buffer(self.sphere.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.sphere.index_count, 0, 0..1);

            render_pass.set_pipeline(&self.ring_pipeline);
            render_pass.set_vertex_buffer(0, self.ring.vertices.slice(..));
            render_pass.set_index_buffer(self.ring.indices.slice(..), wgpu::IndexFormat::Uint32);
            for binding in &self.ring_bindings {
                render_pass.set_bind_group(1, &binding.bind_group, &[]);
                render_pass.draw_indexed(0..self.ring.index_count, 0, 0..1);
            }
        }

        self.targets.readback.copy_from(&mut encoder, &self.targets.output);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Premultiplied RGBA8 pixels of the last rendered frame.
    pub fn read_pixels(&self) -> Result<Vec<u8>, GpuError> {
        self.targets.readback.read_pixels(&self.device)
    }

    /// Free every GPU allocation owned by this renderer.
    pub fn destroy(&self) {
        self.sphere.destroy();
        self.ring.destroy();
        self.scene_uniforms.destroy();
        self.sphere_binding.uniforms.destroy();
        for binding in &self.ring_bindings {
            binding.uniforms.destroy();
        }
        self.env_map.destroy();
        self.targets.destroy();
    }

    fn write_uniforms(&self, scene: &PlanetScene) {
        let camera = scene.camera();
        let lights = scene.lights();
        let ambient = lights.ambient_radiance();

        let mut light_dirs = [[0.0; 4]; 4];
        let mut light_colors = [[0.0; 4]; 4];
        for (i, light) in lights.directional().iter().enumerate() {
            light_dirs[i] = light.direction().extend(0.0).to_array();
            let radiance = light.radiance();
            light_colors[i] = [radiance[0], radiance[1], radiance[2], 0.0];
        }

        let uniforms = SceneUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: [ambient[0], ambient[1], ambient[2], 0.0],
            light_dirs,
            light_colors,
        };
        self.queue
            .write_buffer(&self.scene_uniforms, 0, bytemuck::bytes_of(&uniforms));

        let palette = scene.palette();
        let sphere = ObjectUniforms {
            model: scene.sphere_model().to_cols_array_2d(),
            base: rgba(palette.sphere_top, 1.0),
            secondary: rgba(palette.sphere_bottom, 0.0),
            glow: rgba(palette.sphere_glow, palette.fresnel_intensity),
            params: [scene.params().sphere.radius, 0.0, 0.0, 0.0],
        };
        self.queue.write_buffer(
            &self.sphere_binding.uniforms,
            0,
            bytemuck::bytes_of(&sphere),
        );

        for (ring, binding) in scene.rings().iter().zip(&self.ring_bindings) {
            let model: Mat4 = ring.model();
            let uniforms = ObjectUniforms {
                model: model.to_cols_array_2d(),
                base: rgba(palette.ring_color, 1.0),
                secondary: [
                    scene.params().ring_metalness,
                    palette.ring_roughness,
                    palette.env_map_intensity,
                    0.0,
                ],
                glow: [0.0; 4],
                params: [0.0; 4],
            };
            self.queue
                .write_buffer(&binding.uniforms, 0, bytemuck::bytes_of(&uniforms));
        }
    }
}

fn rgba(rgb: [f32; 3], w: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], w]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 128);
    }

    #[test]
    fn test_sphere_rim_blends_toward_glow() {
        let sphere = PLANET_SHADER
            .split("fn fs_sphere")
            .nth(1)
            .and_then(|body| body.split("@fragment").next())
            .unwrap_or_default();
        assert!(sphere.contains("mix(color, object.glow.rgb, fresnel * object.glow.w)"));
        assert!(!sphere.contains("color += object.glow"));
    }
}
