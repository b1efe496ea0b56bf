//! Hero scene models.
//!
//! A scene owns its camera, geometry, and material parameters, and advances
//! its animation state once per frame. GPU resources are not held here; a
//! render surface uploads what it needs from [`SceneFrame`].
//!
//! - Planet: gradient/Fresnel sphere with two spinning metal rings
//! - Mesh: oscillating node field with proximity connections

pub mod camera;
pub mod connections;
pub mod envmap;
pub mod lights;
pub mod mesh;
pub mod planet;

pub use camera::PerspectiveCamera;
pub use connections::{connect_nodes, LineBuffer, LineVertex};
pub use envmap::{EnvironmentMap, ENV_MAP_SIZE};
pub use lights::{DirectionalLight, LightRig};
pub use mesh::{MeshParams, MeshScene, Node};
pub use planet::{PlanetParams, PlanetScene, RingMesh, RingPlacement};

use crate::device::RenderTier;
use crate::theme::Theme;

/// Errors that can occur while building or resizing a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Environment map generation failed: {0}")]
    EnvMap(String),
    #[error("Viewport has zero area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("Scene requires the full render tier")]
    TierUnavailable,
}

/// Container size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            pixel_ratio: 1.0,
        }
    }
}

/// Pixel ratios above this are clamped for render target sizing.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Effective pixel ratio (clamped to `[1, 2]`).
    pub fn effective_pixel_ratio(&self) -> f32 {
        self.pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
    }

    /// Render target size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio();
        (
            ((self.width as f32 * ratio).round() as u32).max(1),
            ((self.height as f32 * ratio).round() as u32).max(1),
        )
    }

    pub fn ensure_nonempty(&self) -> Result<(), SceneError> {
        if self.is_empty() {
            return Err(SceneError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Inputs a scene is built from. Read-only from the scene's perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDeps {
    pub tier: RenderTier,
    pub theme: Theme,
    pub mobile: bool,
    pub viewport: Viewport,
    /// Seed for node jitter and spin axes.
    pub seed: u32,
}

/// Available scene types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Planet,
    Mesh,
}

/// How a scene reacts to container size changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Adjust camera and surface in place after the debounce.
    Adjust { debounce_ms: u64 },
    /// Tear down and rebuild after the debounce.
    Rebuild { debounce_ms: u64 },
}

impl ResizePolicy {
    pub fn debounce_ms(&self) -> u64 {
        match self {
            Self::Adjust { debounce_ms } | Self::Rebuild { debounce_ms } => *debounce_ms,
        }
    }
}

impl SceneKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Mesh => "mesh",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Mesh, Self::Planet]
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        match self {
            Self::Planet => ResizePolicy::Adjust { debounce_ms: 140 },
            Self::Mesh => ResizePolicy::Rebuild { debounce_ms: 250 },
        }
    }

    /// Whether moving from `old` to `new` dependencies requires a rebuild.
    ///
    /// The planet only depends on theme and mobile class; the mesh also
    /// depends on the container dimensions.
    pub fn needs_rebuild(&self, old: &SceneDeps, new: &SceneDeps) -> bool {
        let common = old.tier != new.tier
            || old.theme != new.theme
            || old.mobile != new.mobile
            || old.seed != new.seed;
        match self {
            Self::Planet => common,
            Self::Mesh => {
                common
                    || old.viewport.width != new.viewport.width
                    || old.viewport.height != new.viewport.height
            }
        }
    }
}

/// Borrowed view of a scene for rendering.
pub enum SceneFrame<'a> {
    Planet(&'a PlanetScene),
    Mesh(&'a MeshScene),
}

impl SceneFrame<'_> {
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Planet(_) => SceneKind::Planet,
            Self::Mesh(_) => SceneKind::Mesh,
        }
    }
}

/// Trait for hero scenes.
pub trait Scene {
    fn kind(&self) -> SceneKind;

    /// Advance animation state.
    ///
    /// `elapsed` is seconds since the scene was built, `delta` seconds since
    /// the previous frame.
    fn update(&mut self, elapsed: f32, delta: f32);

    /// Adjust camera projection for a new container size.
    fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError>;

    fn viewport(&self) -> Viewport;

    fn frame(&self) -> SceneFrame<'_>;

    /// Stop animations and drop CPU-side geometry.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Build a scene from its dependencies.
pub fn build_scene(kind: SceneKind, deps: &SceneDeps) -> Result<Box<dyn Scene>, SceneError> {
    if deps.tier != RenderTier::Full {
        return Err(SceneError::TierUnavailable);
    }
    deps.viewport.ensure_nonempty()?;
    Ok(match kind {
        SceneKind::Planet => Box::new(PlanetScene::build(deps)?),
        SceneKind::Mesh => Box::new(MeshScene::build(deps)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn deps() -> SceneDeps {
        SceneDeps {
            tier: RenderTier::Full,
            theme: Theme::Dark,
            mobile: false,
            viewport: Viewport::new(1280, 720, 1.0),
            seed: 7,
        }
    }

    #[test]
    fn test_build_scene_returns_correct_kind() {
        for kind in SceneKind::all() {
            let scene = build_scene(*kind, &deps()).unwrap();
            assert_eq!(scene.kind(), *kind);
        }
    }

    #[test]
    fn test_fallback_tier_builds_nothing() {
        let deps = SceneDeps {
            tier: RenderTier::Fallback,
            ..deps()
        };
        assert!(matches!(
            build_scene(SceneKind::Planet, &deps),
            Err(SceneError::TierUnavailable)
        ));
    }

    #[test]
    fn test_zero_viewport_is_rejected() {
        let deps = SceneDeps {
            viewport: Viewport::new(0, 600, 1.0),
            ..deps()
        };
        assert!(matches!(
            build_scene(SceneKind::Mesh, &deps),
            Err(SceneError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn test_rebuild_rules() {
        let old = deps();
        let resized = SceneDeps {
            viewport: Viewport::new(1000, 700, 1.0),
            ..old
        };
        assert!(!SceneKind::Planet.needs_rebuild(&old, &resized));
        assert!(SceneKind::Mesh.needs_rebuild(&old, &resized));

        let rethemed = SceneDeps {
            theme: Theme::Light,
            ..old
        };
        assert!(SceneKind::Planet.needs_rebuild(&old, &rethemed));
        assert!(SceneKind::Mesh.needs_rebuild(&old, &rethemed));

        let ratio_only = SceneDeps {
            viewport: Viewport::new(1280, 720, 2.0),
            ..old
        };
        assert!(!SceneKind::Mesh.needs_rebuild(&old, &ratio_only));
    }

    #[test]
    fn test_physical_size_clamps_pixel_ratio() {
        let viewport = Viewport::new(100, 50, 3.0);
        assert_eq!(viewport.physical_size(), (200, 100));
        let viewport = Viewport::new(100, 50, 0.5);
        assert_eq!(viewport.physical_size(), (100, 50));
    }
}
