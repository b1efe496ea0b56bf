//! Cooperative frame host.
//!
//! Everything here runs on one thread and is driven by caller-supplied
//! monotonic timestamps:
//! - [`FrameLoop`]: per-frame scheduling state
//! - [`Debouncer`]: trailing-edge resize debounce
//! - [`SurfaceFactory`] / [`RenderSurface`]: where scenes are drawn
//! - [`GraphicHost`]: build, animate, resize, and tear down one scene
//! - [`HeroStage`]: classifier plus mesh and planet layers

mod debounce;
mod frame_loop;
mod host;
mod stage;
mod surface;

pub use debounce::Debouncer;
pub use frame_loop::{FrameLoop, FrameTick, LoopState};
pub use host::GraphicHost;
pub use stage::{fallback_art_path, HeroStage, StageEvent, StageFrame, FALLBACK_MOBILE_MAX_WIDTH};
pub use surface::{LayerStyle, RenderSurface, SurfaceError, SurfaceFactory};
