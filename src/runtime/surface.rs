//! Seam between scene models and the resources that draw them.

use crate::gpu::GpuError;
use crate::scene::{SceneFrame, SceneKind, Viewport};

/// Errors raised by render surfaces.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Surface has been released")]
    Released,
    #[error("Layer {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("Surface was created for {expected} scenes, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Compositing style applied to a whole layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub opacity: f32,
    /// Downward offset in CSS pixels.
    pub offset_y: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            offset_y: 0.0,
        }
    }
}

/// Drawing target owned by one host.
pub trait RenderSurface {
    /// Draw the current scene state.
    fn draw(&mut self, frame: SceneFrame<'_>, style: &LayerStyle) -> Result<(), SurfaceError>;

    /// Resize backing storage.
    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError>;

    /// Release every resource. Idempotent.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Creates surfaces for freshly built scenes.
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    /// Acquire a surface sized for `viewport` and upload static scene data.
    fn create(
        &mut self,
        kind: SceneKind,
        frame: SceneFrame<'_>,
        viewport: Viewport,
    ) -> Result<Self::Surface, SurfaceError>;
}
