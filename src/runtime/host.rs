//! Per-graphic lifecycle host.
//!
//! A host owns at most one scene and its surface. It rebuilds when a
//! dependency changes, debounces container resizes, advances the frame loop,
//! and tears everything down synchronously on unmount. Build and draw
//! failures are logged and never propagated: a hero graphic is decorative.

use super::{Debouncer, FrameLoop, LayerStyle, RenderSurface, SurfaceFactory};
use crate::scene::{build_scene, ResizePolicy, Scene, SceneDeps, SceneKind, Viewport};
use std::time::Duration;

/// Lifecycle host for one scene kind.
pub struct GraphicHost<F: SurfaceFactory> {
    kind: SceneKind,
    factory: F,
    deps: Option<SceneDeps>,
    scene: Option<Box<dyn Scene>>,
    surface: Option<F::Surface>,
    frame_loop: FrameLoop,
    resize: Debouncer<Viewport>,
    style: LayerStyle,
    builds: u64,
}

impl<F: SurfaceFactory> GraphicHost<F> {
    pub fn new(kind: SceneKind, factory: F) -> Self {
        let resize = Debouncer::from_millis(kind.resize_policy().debounce_ms());
        Self {
            kind,
            factory,
            deps: None,
            scene: None,
            surface: None,
            frame_loop: FrameLoop::new(),
            resize,
            style: LayerStyle::default(),
            builds: 0,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Whether a scene is live.
    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn deps(&self) -> Option<&SceneDeps> {
        self.deps.as_ref()
    }

    pub fn scene(&self) -> Option<&dyn Scene> {
        self.scene.as_deref()
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.surface.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Number of successful builds since creation.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn style(&self) -> LayerStyle {
        self.style
    }

    pub fn set_style(&mut self, style: LayerStyle) {
        self.style = style;
    }

    /// Build the scene for `deps`, replacing anything already mounted.
    pub fn mount(&mut self, deps: SceneDeps, now: Duration) -> bool {
        self.teardown();
        self.deps = Some(deps);
        self.build(now)
    }

    /// Apply new dependencies.
    ///
    /// Changes that require a rebuild (other than container size) rebuild
    /// immediately. A pure size change is handed to the resize debouncer.
    /// An empty viewport never replaces a live scene; the next non-empty
    /// update is compared against the deps it was built with.
    pub fn set_deps(&mut self, deps: SceneDeps, now: Duration) {
        if deps.viewport.is_empty() && self.is_mounted() {
            log::debug!(
                "Keeping {} scene over empty viewport {}x{}",
                self.kind.name(),
                deps.viewport.width,
                deps.viewport.height
            );
            return;
        }
        let Some(current) = self.deps else {
            self.mount(deps, now);
            return;
        };

        let same_size = SceneDeps {
            viewport: current.viewport,
            ..deps
        };
        if self.kind.needs_rebuild(&current, &same_size) || !self.is_mounted() {
            self.mount(deps, now);
        } else if deps.viewport != current.viewport {
            self.on_viewport(deps.viewport, now);
        }
    }

    /// Schedule a resize.
    pub fn on_viewport(&mut self, viewport: Viewport, now: Duration) {
        if self.deps.is_none() {
            return;
        }
        self.resize.push(viewport, now);
    }

    /// Run one frame: flush a due resize, advance the scene, draw.
    ///
    /// Returns true when the surface was drawn.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        if let Some(viewport) = self.resize.poll(now) {
            self.apply_resize(viewport, now);
        }

        let Some(tick) = self.frame_loop.advance(now) else {
            return false;
        };
        let (Some(scene), Some(surface)) = (self.scene.as_mut(), self.surface.as_mut()) else {
            return false;
        };

        scene.update(tick.elapsed, tick.delta);
        match surface.draw(scene.frame(), &self.style) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipped {} frame {}: {}", self.kind.name(), tick.index, e);
                false
            }
        }
    }

    /// Cancel the loop, clear timers, and release the scene and surface.
    pub fn unmount(&mut self) {
        self.teardown();
        self.deps = None;
    }

    /// 1 while a frame callback is scheduled.
    pub fn pending_frames(&self) -> usize {
        usize::from(self.frame_loop.is_scheduled())
    }

    /// 1 while a resize timer is pending.
    pub fn pending_timers(&self) -> usize {
        usize::from(self.resize.is_pending())
    }

    fn build(&mut self, now: Duration) -> bool {
        let Some(deps) = self.deps else {
            return false;
        };

        let scene = match build_scene(self.kind, &deps) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Failed to build {} scene: {}", self.kind.name(), e);
                return false;
            }
        };

        let surface = match self.factory.create(self.kind, scene.frame(), deps.viewport) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to acquire {} surface: {}", self.kind.name(), e);
                let mut scene = scene;
                scene.dispose();
                return false;
            }
        };

        self.scene = Some(scene);
        self.surface = Some(surface);
        self.frame_loop.start(now);
        self.builds += 1;
        log::debug!("Mounted {} scene (build {})", self.kind.name(), self.builds);
        true
    }

    fn apply_resize(&mut self, viewport: Viewport, now: Duration) {
        if viewport.is_empty() {
            log::debug!(
                "Skipping {} resize to empty viewport {}x{}",
                self.kind.name(),
                viewport.width,
                viewport.height
            );
            return;
        }
        let Some(deps) = self.deps.as_mut() else {
            return;
        };
        deps.viewport = viewport;

        match self.kind.resize_policy() {
            ResizePolicy::Rebuild { .. } => {
                let deps = *deps;
                self.mount(deps, now);
            }
            ResizePolicy::Adjust { .. } => {
                if let Some(scene) = self.scene.as_mut() {
                    if let Err(e) = scene.resize(viewport) {
                        log::warn!("Skipped {} resize: {}", self.kind.name(), e);
                        return;
                    }
                }
                if let Some(surface) = self.surface.as_mut() {
                    if let Err(e) = surface.resize(viewport) {
                        log::warn!("Surface resize failed for {}: {}", self.kind.name(), e);
                    }
                }
            }
        }
    }

    fn teardown(&mut self) {
        self.frame_loop.cancel();
        self.resize.cancel();
        if let Some(mut scene) = self.scene.take() {
            scene.dispose();
        }
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }
}

impl<F: SurfaceFactory> Drop for GraphicHost<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
