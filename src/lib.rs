//! Hero Graphics Core
//!
//! Adaptive hero graphics for a landing page: a capability classifier picks a
//! render tier, and on capable devices two layered animated scenes are built
//! and driven frame by frame.
//!
//! # Features
//!
//! - Device capability classification (full scenes or static artwork)
//! - Planet scene: gradient sphere with spinning metallic rings
//! - Mesh scene: drifting nodes joined by distance-faded lines
//! - Frame hosts with debounced resize and guaranteed teardown
//! - Scroll parallax and entrance tweens
//! - Headless GPU rendering via wgpu (Metal on macOS, Vulkan on Linux)
//! - PNG frame output for offline previews

pub mod animation;
pub mod device;
pub mod geometry;
pub mod gpu;
pub mod pipeline;
pub mod rng;
pub mod runtime;
pub mod scene;
pub mod theme;

// Re-export commonly used types
pub use device::{classify, DeviceProfile, DeviceSignals, RenderTier, TierClassifier};
pub use gpu::{GpuContext, GpuSurfaceFactory};
pub use pipeline::{parse_hex_color, render_hero, HeroConfig, PipelineError, RenderSummary};
pub use runtime::{GraphicHost, HeroStage, LayerStyle, RenderSurface, StageEvent, SurfaceFactory};
pub use scene::{build_scene, MeshScene, PlanetScene, Scene, SceneDeps, SceneKind, Viewport};
pub use theme::Theme;
