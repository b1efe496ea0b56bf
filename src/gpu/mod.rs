//! GPU rendering using wgpu.
//!
//! Provides headless offscreen rendering for the hero scenes: each layer is
//! drawn into its own render target and read back to the CPU for
//! compositing.

pub mod context;
pub mod layouts;
pub mod mesh_renderer;
pub mod pipelines;
pub mod planet_renderer;
pub mod surface;
pub mod textures;

pub use context::{ContextOptions, GpuContext, GpuError};
pub use mesh_renderer::MeshRenderer;
pub use planet_renderer::{PlanetRenderer, PLANET_MSAA_SAMPLES};
pub use surface::{check_layer_size, GpuSurface, GpuSurfaceFactory, LayerPixels};
