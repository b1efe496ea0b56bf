//! wgpu-backed render surfaces for the graphic hosts.

use super::{GpuContext, MeshRenderer, PlanetRenderer};
use crate::runtime::{LayerStyle, RenderSurface, SurfaceError, SurfaceFactory};
use crate::scene::{SceneFrame, SceneKind, Viewport};
use std::sync::Arc;

/// Pixels of one rendered layer plus the style to composite it with.
#[derive(Debug, Clone)]
pub struct LayerPixels {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8.
    pub pixels: Vec<u8>,
    pub style: LayerStyle,
    pub pixel_ratio: f32,
}

enum LayerRenderer {
    Planet(PlanetRenderer),
    Mesh(MeshRenderer),
}

impl LayerRenderer {
    fn kind(&self) -> SceneKind {
        match self {
            Self::Planet(_) => SceneKind::Planet,
            Self::Mesh(_) => SceneKind::Mesh,
        }
    }

    fn size(&self) -> (u32, u32) {
        match self {
            Self::Planet(r) => r.size(),
            Self::Mesh(r) => r.size(),
        }
    }

    fn destroy(&self) {
        match self {
            Self::Planet(r) => r.destroy(),
            Self::Mesh(r) => r.destroy(),
        }
    }
}

/// Reject layers whose physical size the device cannot allocate.
pub fn check_layer_size(viewport: Viewport, max: u32) -> Result<(u32, u32), SurfaceError> {
    let (width, height) = viewport.physical_size();
    if width > max || height > max {
        return Err(SurfaceError::TooLarge { width, height, max });
    }
    Ok((width, height))
}

/// Offscreen surface owning one renderer.
pub struct GpuSurface {
    renderer: Option<LayerRenderer>,
    max_size: u32,
    viewport: Viewport,
    style: LayerStyle,
    frames: u64,
}

impl GpuSurface {
    /// Frames drawn since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.renderer.as_ref().map(LayerRenderer::size)
    }

    /// Read back the most recent frame.
    pub fn read_layer(&self) -> Result<LayerPixels, SurfaceError> {
        let renderer = self.renderer.as_ref().ok_or(SurfaceError::Released)?;
        let (width, height) = renderer.size();
        let pixels = match renderer {
            LayerRenderer::Planet(r) => r.read_pixels()?,
            LayerRenderer::Mesh(r) => r.read_pixels()?,
        };
        Ok(LayerPixels {
            width,
            height,
            pixels,
            style: self.style,
            pixel_ratio: self.viewport.effective_pixel_ratio(),
        })
    }
}

impl RenderSurface for GpuSurface {
    fn draw(&mut self, frame: SceneFrame<'_>, style: &LayerStyle) -> Result<(), SurfaceError> {
        let renderer = self.renderer.as_ref().ok_or(SurfaceError::Released)?;
        match (renderer, frame) {
            (LayerRenderer::Planet(r), SceneFrame::Planet(scene)) => r.render(scene),
            (LayerRenderer::Mesh(r), SceneFrame::Mesh(scene)) => r.render(scene),
            (renderer, frame) => {
                return Err(SurfaceError::KindMismatch {
                    expected: renderer.kind().name(),
                    actual: frame.kind().name(),
                })
            }
        }
        self.style = *style;
        self.frames += 1;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        check_layer_size(viewport, self.max_size)?;
        let renderer = self.renderer.as_mut().ok_or(SurfaceError::Released)?;
        match renderer {
            LayerRenderer::Planet(r) => r.resize(viewport),
            LayerRenderer::Mesh(r) => r.resize(viewport),
        }
        self.viewport = viewport;
        Ok(())
    }

    fn release(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
            log::debug!("Released {} surface", renderer.kind().name());
        }
    }

    fn is_released(&self) -> bool {
        self.renderer.is_none()
    }
}

impl Drop for GpuSurface {
    fn drop(&mut self) {
        self.release();
    }
}

/// Creates [`GpuSurface`]s on a shared context.
#[derive(Clone)]
pub struct GpuSurfaceFactory {
    ctx: Arc<GpuContext>,
}

impl GpuSurfaceFactory {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }
}

impl SurfaceFactory for GpuSurfaceFactory {
    type Surface = GpuSurface;

    fn create(
        &mut self,
        kind: SceneKind,
        frame: SceneFrame<'_>,
        viewport: Viewport,
    ) -> Result<GpuSurface, SurfaceError> {
        if frame.kind() != kind {
            return Err(SurfaceError::KindMismatch {
                expected: kind.name(),
                actual: frame.kind().name(),
            });
        }
        let max_size = self.ctx.max_layer_size();
        check_layer_size(viewport, max_size)?;
        let renderer = match frame {
            SceneFrame::Planet(scene) => {
                LayerRenderer::Planet(PlanetRenderer::new(&self.ctx, scene, viewport))
            }
            SceneFrame::Mesh(scene) => LayerRenderer::Mesh(MeshRenderer::new(&self.ctx, scene, viewport)),
        };
        let (width, height) = renderer.size();
        log::debug!("Created {} surface {}x{}", kind.name(), width, height);
        Ok(GpuSurface {
            renderer: Some(renderer),
            max_size,
            viewport,
            style: LayerStyle::default(),
            frames: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_within_limit_passes() {
        assert_eq!(check_layer_size(Viewport::new(1920, 1080, 1.0), 8192).ok(), Some((1920, 1080)));
    }

    #[test]
    fn test_layer_over_limit_is_rejected() {
        let result = check_layer_size(Viewport::new(20_000, 600, 1.0), 16_384);
        assert!(matches!(
            result,
            Err(SurfaceError::TooLarge { width: 20_000, height: 600, max: 16_384 })
        ));
    }

    #[test]
    fn test_limit_applies_to_physical_pixels() {
        let result = check_layer_size(Viewport::new(5000, 600, 2.0), 8192);
        assert!(matches!(result, Err(SurfaceError::TooLarge { width: 10_000, .. })));
    }
}
