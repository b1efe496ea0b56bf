//! Hero stage: the classifier driving two layered graphic hosts.
//!
//! The mesh sits behind the planet. On the full tier both hosts are mounted
//! and fade in with their entrance tweens; the planet also follows the
//! scroll parallax. On the fallback tier no host is mounted and the stage
//! reports the static artwork to show instead.

use super::{GraphicHost, LayerStyle, SurfaceFactory};
use crate::animation::{parallax_style, LayerEntrance, ScrollTrigger, ScrubSmoother};
use crate::device::{ConnectionInfo, DeviceSignals, RenderTier, SignalChange, TierClassifier};
use crate::scene::{SceneDeps, SceneKind, Viewport};
use crate::theme::Theme;
use std::time::Duration;

/// Widths at or below this use the mobile fallback artwork.
pub const FALLBACK_MOBILE_MAX_WIDTH: u32 = 767;

/// Path of the static artwork shown on the fallback tier.
pub fn fallback_art_path(viewport_width: u32, theme: Theme) -> String {
    let class = if viewport_width <= FALLBACK_MOBILE_MAX_WIDTH {
        "mobile"
    } else {
        "desktop"
    };
    format!("/hero-fallback-{}-{}.png", class, theme.name())
}

/// Page-level events the stage reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    Viewport(Viewport),
    ReducedMotion(bool),
    Connection(Option<ConnectionInfo>),
    Theme(Theme),
    /// Container top edge relative to the viewport top, in CSS pixels.
    Scroll { element_top: f32 },
}

/// What a stage frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFrame {
    pub tier: RenderTier,
    pub mesh_drawn: bool,
    pub planet_drawn: bool,
    pub mesh_style: LayerStyle,
    pub planet_style: LayerStyle,
    /// Artwork path and opacity when the fallback tier is active.
    pub fallback: Option<(String, f32)>,
}

/// Classifier plus mesh and planet hosts.
pub struct HeroStage<F: SurfaceFactory + Clone> {
    classifier: TierClassifier,
    theme: Theme,
    viewport: Viewport,
    seed: u32,
    mesh: GraphicHost<F>,
    planet: GraphicHost<F>,
    entrance_start: Duration,
    trigger: ScrollTrigger,
    scrub: ScrubSmoother,
    last_frame: Option<Duration>,
    mounted: bool,
}

impl<F: SurfaceFactory + Clone> HeroStage<F> {
    pub fn new(signals: DeviceSignals, theme: Theme, viewport: Viewport, seed: u32, factory: F) -> Self {
        let signals = DeviceSignals {
            viewport_width: Some(viewport.width),
            ..signals
        };
        Self {
            classifier: TierClassifier::new(signals),
            theme,
            viewport,
            seed,
            mesh: GraphicHost::new(SceneKind::Mesh, factory.clone()),
            planet: GraphicHost::new(SceneKind::Planet, factory),
            entrance_start: Duration::ZERO,
            trigger: ScrollTrigger::default(),
            scrub: ScrubSmoother::default(),
            last_frame: None,
            mounted: false,
        }
    }

    /// Classify and mount the hosts the tier allows.
    pub fn mount(&mut self, now: Duration) {
        self.mounted = true;
        self.classifier.evaluate();
        self.entrance_start = now;
        self.sync_hosts(now);
    }

    pub fn tier(&self) -> RenderTier {
        self.classifier.current()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    pub fn mesh(&self) -> &GraphicHost<F> {
        &self.mesh
    }

    pub fn planet(&self) -> &GraphicHost<F> {
        &self.planet
    }

    /// Smoothed scroll progress in `[0, 1]`.
    pub fn scroll_progress(&self) -> f32 {
        self.scrub.value()
    }

    /// Artwork to display when the fallback tier is active.
    pub fn fallback_art(&self) -> Option<String> {
        (self.tier() == RenderTier::Fallback).then(|| fallback_art_path(self.viewport.width, self.theme))
    }

    pub fn handle(&mut self, event: StageEvent, now: Duration) {
        let tier_changed = match event {
            StageEvent::Viewport(viewport) => {
                self.viewport = viewport;
                self.classifier.apply(SignalChange::Viewport(viewport.width))
            }
            StageEvent::ReducedMotion(reduced) => {
                self.classifier.apply(SignalChange::ReducedMotion(reduced))
            }
            StageEvent::Connection(connection) => {
                self.classifier.apply(SignalChange::Connection(connection))
            }
            StageEvent::Theme(theme) => {
                self.theme = theme;
                None
            }
            StageEvent::Scroll { element_top } => {
                let progress = self.trigger.progress(element_top, self.viewport.height as f32);
                self.scrub.set_target(progress);
                return;
            }
        };

        if tier_changed.is_some() {
            self.entrance_start = now;
        }
        if self.mounted {
            self.sync_hosts(now);
        }
    }

    /// Run one frame across both layers.
    pub fn on_frame(&mut self, now: Duration) -> StageFrame {
        let dt = self
            .last_frame
            .map(|last| now.saturating_sub(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.scrub.update(dt);

        let since_entrance = now.saturating_sub(self.entrance_start).as_secs_f32();
        let tier = self.tier();

        if tier == RenderTier::Fallback || !self.mounted {
            let (opacity, _) = LayerEntrance::fallback().sample(since_entrance);
            return StageFrame {
                tier,
                mesh_drawn: false,
                planet_drawn: false,
                mesh_style: LayerStyle::default(),
                planet_style: LayerStyle::default(),
                fallback: self.fallback_art().map(|path| (path, opacity)),
            };
        }

        let mesh_style = self.mesh_style(since_entrance);
        let planet_style = self.planet_style(since_entrance);
        self.mesh.set_style(mesh_style);
        self.planet.set_style(planet_style);

        let mesh_drawn = self.mesh.on_frame(now);
        let planet_drawn = self.planet.on_frame(now);

        StageFrame {
            tier,
            mesh_drawn,
            planet_drawn,
            mesh_style,
            planet_style,
            fallback: None,
        }
    }

    /// Tear down both hosts.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.mesh.unmount();
        self.planet.unmount();
        self.last_frame = None;
    }

    pub fn pending_frames(&self) -> usize {
        self.mesh.pending_frames() + self.planet.pending_frames()
    }

    pub fn pending_timers(&self) -> usize {
        self.mesh.pending_timers() + self.planet.pending_timers()
    }

    fn scene_deps(&self) -> SceneDeps {
        SceneDeps {
            tier: self.tier(),
            theme: self.theme,
            mobile: self.classifier.profile().is_mobile(),
            viewport: self.viewport,
            seed: self.seed,
        }
    }

    fn sync_hosts(&mut self, now: Duration) {
        if self.tier() != RenderTier::Full {
            if self.mesh.deps().is_some() || self.planet.deps().is_some() {
                log::info!("Fallback tier active, unmounting hero graphics");
            }
            self.mesh.unmount();
            self.planet.unmount();
            return;
        }
        let deps = self.scene_deps();
        self.mesh.set_deps(deps, now);
        self.planet.set_deps(deps, now);
    }

    fn mesh_style(&self, since_entrance: f32) -> LayerStyle {
        let (opacity, offset_y) = LayerEntrance::mesh().sample(since_entrance);
        LayerStyle { opacity, offset_y }
    }

    fn planet_style(&self, since_entrance: f32) -> LayerStyle {
        let (opacity, offset_y) = LayerEntrance::planet().sample(since_entrance);
        let parallax = parallax_style(self.scrub.value(), self.viewport.height as f32);
        LayerStyle {
            opacity: opacity * parallax.opacity,
            offset_y: offset_y + parallax.translate_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_art_path() {
        assert_eq!(
            fallback_art_path(375, Theme::Dark),
            "/hero-fallback-mobile-dark.png"
        );
        assert_eq!(
            fallback_art_path(767, Theme::Light),
            "/hero-fallback-mobile-light.png"
        );
        assert_eq!(
            fallback_art_path(768, Theme::Light),
            "/hero-fallback-desktop-light.png"
        );
    }
}
