//! Offscreen layer attachments and CPU readback.

use super::pipelines::DEPTH_FORMAT;
use super::GpuError;
use image::RgbaImage;
use wgpu::{Device, Queue, Texture, TextureFormat, TextureUsages, TextureView};

/// Color format of every layer target.
pub const LAYER_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Role a texture plays in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Single-sampled color that is copied back to the CPU.
    Output,
    /// Multisampled color resolved into an [`TargetKind::Output`].
    Msaa,
    Depth,
    /// Read-only texture sampled by a shader.
    Sampled,
}

impl TargetKind {
    pub fn format(&self) -> TextureFormat {
        match self {
            Self::Depth => DEPTH_FORMAT,
            _ => LAYER_FORMAT,
        }
    }

    pub fn usage(&self) -> TextureUsages {
        match self {
            Self::Output => TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            Self::Msaa | Self::Depth => TextureUsages::RENDER_ATTACHMENT,
            Self::Sampled => TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        }
    }
}

/// Texture kept together with its default view.
pub struct RenderTarget {
    texture: Texture,
    view: TextureView,
    kind: TargetKind,
}

impl RenderTarget {
    pub fn new(device: &Device, label: &str, kind: TargetKind, width: u32, height: u32, samples: u32) -> Self {
        let samples = match kind {
            TargetKind::Msaa | TargetKind::Depth => samples.max(1),
            TargetKind::Output | TargetKind::Sampled => 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format: kind.format(),
            usage: kind.usage(),
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, kind }
    }

    /// Upload an RGBA image as a sampled texture.
    pub fn upload(device: &Device, queue: &Queue, label: &str, image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let target = Self::new(device, label, TargetKind::Sampled, width, height, 1);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            target.texture.size(),
        );
        target
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// Free the GPU allocation immediately.
    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Row pitch of an RGBA8 copy, padded to the copy alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pub width: u32,
    pub height: u32,
    pub padded_bytes: u32,
}

impl RowLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        Self {
            width,
            height,
            padded_bytes: (width * 4).div_ceil(align) * align,
        }
    }

    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }

    pub fn buffer_size(&self) -> u64 {
        self.padded_bytes as u64 * self.height as u64
    }

    /// Tightly packed copy of padded `data`.
    pub fn unpad(&self, data: &[u8]) -> Vec<u8> {
        let row = self.row_bytes() as usize;
        data.chunks(self.padded_bytes as usize)
            .take(self.height as usize)
            .flat_map(|chunk| &chunk[..row.min(chunk.len())])
            .copied()
            .collect()
    }
}

/// Mappable buffer a layer is copied into after each frame.
pub struct ReadbackBuffer {
    buffer: wgpu::Buffer,
    layout: RowLayout,
}

impl ReadbackBuffer {
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let layout = RowLayout::new(width, height);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("layer_readback"),
            size: layout.buffer_size(),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self { buffer, layout }
    }

    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Record a copy of `target` into this buffer.
    pub fn copy_from(&self, encoder: &mut wgpu::CommandEncoder, target: &RenderTarget) {
        encoder.copy_texture_to_buffer(
            target.texture().as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.layout.padded_bytes),
                    rows_per_image: Some(self.layout.height),
                },
            },
            extent(self.layout.width, self.layout.height),
        );
    }

    /// Block until the last copy lands and return packed RGBA8 rows.
    pub fn read_pixels(&self, device: &Device) -> Result<Vec<u8>, GpuError> {
        let slice = self.buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::PollType::wait_indefinitely())?;
        receiver
            .recv()
            .map_err(|e| GpuError::Readback(e.to_string()))??;

        let pixels = self.layout.unpad(&slice.get_mapped_range());
        self.buffer.unmap();
        Ok(pixels)
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}

/// Everything one layer draws into: the output color, an optional MSAA
/// color, an optional depth buffer, and the readback buffer.
pub struct LayerTargets {
    pub output: RenderTarget,
    pub msaa: Option<RenderTarget>,
    pub depth: Option<RenderTarget>,
    pub readback: ReadbackBuffer,
    sample_count: u32,
}

impl LayerTargets {
    pub fn new(device: &Device, label: &str, width: u32, height: u32, sample_count: u32, with_depth: bool) -> Self {
        let sample_count = sample_count.max(1);
        let msaa = (sample_count > 1)
            .then(|| RenderTarget::new(device, label, TargetKind::Msaa, width, height, sample_count));
        let depth = with_depth
            .then(|| RenderTarget::new(device, label, TargetKind::Depth, width, height, sample_count));
        Self {
            output: RenderTarget::new(device, label, TargetKind::Output, width, height, 1),
            msaa,
            depth,
            readback: ReadbackBuffer::new(device, width, height),
            sample_count,
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> (u32, u32) {
        self.output.size()
    }

    /// Color attachment cleared to transparent, resolving when multisampled.
    pub fn color_attachment(&self) -> wgpu::RenderPassColorAttachment<'_> {
        let (view, resolve_target) = match &self.msaa {
            Some(msaa) => (msaa.view(), Some(self.output.view())),
            None => (self.output.view(), None),
        };
        wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        }
    }

    pub fn depth_attachment(&self) -> Option<wgpu::RenderPassDepthStencilAttachment<'_>> {
        self.depth.as_ref().map(|depth| wgpu::RenderPassDepthStencilAttachment {
            view: depth.view(),
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        })
    }

    pub fn destroy(&self) {
        self.output.destroy();
        for target in self.msaa.iter().chain(self.depth.iter()) {
            target.destroy();
        }
        self.readback.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuContext;

    #[test]
    fn test_row_layout_padding() {
        let layout = RowLayout::new(100, 3);
        assert_eq!(layout.row_bytes(), 400);
        assert_eq!(layout.padded_bytes % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);
        assert!(layout.padded_bytes >= 400);
        assert_eq!(layout.buffer_size(), layout.padded_bytes as u64 * 3);
    }

    #[test]
    fn test_unpad_drops_row_padding() {
        let layout = RowLayout::new(2, 2);
        let pitch = layout.padded_bytes as usize;
        let mut data = vec![0xAAu8; pitch * 2];
        data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        data[pitch..pitch + 8].copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);

        let pixels = layout.unpad(&data);
        assert_eq!(pixels, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_target_kinds() {
        assert_eq!(TargetKind::Depth.format(), DEPTH_FORMAT);
        assert_eq!(TargetKind::Msaa.format(), LAYER_FORMAT);
        assert!(TargetKind::Output.usage().contains(TextureUsages::COPY_SRC));
        assert!(TargetKind::Sampled.usage().contains(TextureUsages::TEXTURE_BINDING));
    }

    #[tokio::test]
    async fn test_layer_targets_allocation() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };

        let plain = LayerTargets::new(&ctx.device, "test", 256, 128, 1, false);
        assert_eq!(plain.size(), (256, 128));
        assert!(plain.msaa.is_none() && plain.depth.is_none());

        let planet = LayerTargets::new(&ctx.device, "test", 64, 64, 4, true);
        assert_eq!(planet.sample_count(), 4);
        assert!(planet.msaa.is_some() && planet.depth.is_some());
        planet.destroy();
    }
}
