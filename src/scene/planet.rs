//! Planet scene: a gradient sphere with a Fresnel rim and two metal rings.

use super::{
    EnvironmentMap, LightRig, PerspectiveCamera, Scene, SceneDeps, SceneError, SceneFrame,
    SceneKind, Viewport, ENV_MAP_SIZE,
};
use crate::animation::{RingSpin, SpinTiming};
use crate::geometry::{ring_geometry, sphere_geometry, GeometryBuffers, RingParams, SphereParams};
use crate::rng::Rng;
use crate::theme::PlanetPalette;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::PI;

/// Where a ring sits relative to the sphere and how it is tilted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPlacement {
    /// Base tilt as XYZ Euler angles in radians.
    pub euler: [f32; 3],
    /// Offset from the sphere center.
    pub offset: Vec3,
}

impl RingPlacement {
    pub fn base_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.euler[0], self.euler[1], self.euler[2])
    }
}

/// Planet scene parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetParams {
    pub fov: f32,
    pub camera_z: f32,
    pub camera_y: f32,
    pub look_at: Vec3,
    pub near: f32,
    pub far: f32,
    pub sphere: SphereParams,
    pub sphere_center: Vec3,
    pub ring: RingParams,
    pub rings: [RingPlacement; 2],
    pub ring_metalness: f32,
    /// Sphere yaw rate in radians per second.
    pub yaw_rate: f32,
    pub spin: SpinTiming,
    pub env_map_size: u32,
    /// Multisampling is only requested on non-mobile devices.
    pub antialias: bool,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self::for_class(false)
    }
}

impl PlanetParams {
    /// Parameters for the given device class.
    pub fn for_class(mobile: bool) -> Self {
        let segments = if mobile { 64 } else { 128 };
        Self {
            fov: if mobile { 55.0 } else { 45.0 },
            camera_z: if mobile { 18.0 } else { 14.0 },
            camera_y: 1.0,
            look_at: Vec3::new(0.0, -2.0, 0.0),
            near: 0.1,
            far: 100.0,
            sphere: SphereParams {
                radius: 7.0,
                width_segments: segments,
                height_segments: segments,
            },
            sphere_center: Vec3::new(0.0, -5.0, 0.0),
            ring: RingParams::default(),
            rings: [
                RingPlacement {
                    euler: [PI * 0.79, -0.3, 0.15],
                    offset: Vec3::new(-0.5, -0.5, 1.0),
                },
                RingPlacement {
                    euler: [PI * 0.77, -0.35, -1.3],
                    offset: Vec3::new(0.1, 0.5, 1.0),
                },
            ],
            ring_metalness: 0.7,
            yaw_rate: 0.03,
            spin: SpinTiming::default(),
            env_map_size: ENV_MAP_SIZE,
            antialias: !mobile,
        }
    }
}

/// One metal ring with its animation state.
#[derive(Debug, Clone)]
pub struct RingMesh {
    pub geometry: GeometryBuffers,
    pub base_rotation: Quat,
    pub position: Vec3,
    spin: RingSpin,
    rotation: Quat,
}

impl RingMesh {
    fn new(geometry: GeometryBuffers, placement: &RingPlacement, center: Vec3, spin: RingSpin) -> Self {
        let base_rotation = placement.base_rotation();
        Self {
            geometry,
            base_rotation,
            position: center + placement.offset,
            spin,
            rotation: base_rotation,
        }
    }

    /// Current orientation: spin applied in world space on top of the base tilt.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn spin(&self) -> &RingSpin {
        &self.spin
    }

    fn update(&mut self, elapsed: f32) {
        let spin = self.spin.sample(elapsed);
        self.rotation = (spin * self.base_rotation).normalize();
    }
}

/// Planet scene state.
#[derive(Debug)]
pub struct PlanetScene {
    params: PlanetParams,
    palette: PlanetPalette,
    lights: LightRig,
    camera: PerspectiveCamera,
    viewport: Viewport,
    sphere: GeometryBuffers,
    sphere_yaw: f32,
    rings: Vec<RingMesh>,
    env_map: EnvironmentMap,
    elapsed: f32,
    disposed: bool,
}

impl PlanetScene {
    pub fn build(deps: &SceneDeps) -> Result<Self, SceneError> {
        Self::with_params(deps, PlanetParams::for_class(deps.mobile))
    }

    pub fn with_params(deps: &SceneDeps, params: PlanetParams) -> Result<Self, SceneError> {
        deps.viewport.ensure_nonempty()?;

        let palette = PlanetPalette::for_theme(deps.theme);
        let env_map = EnvironmentMap::generate(params.env_map_size, &palette.env_gradient)?;

        let camera = PerspectiveCamera::new(params.fov, deps.viewport.aspect(), params.near, params.far)
            .look_at(
                Vec3::new(0.0, params.camera_y, params.camera_z),
                params.look_at,
            );

        let sphere = sphere_geometry(&params.sphere);
        let ring = ring_geometry(&params.ring);

        let mut rng = Rng::new(deps.seed);
        let rings = params
            .rings
            .iter()
            .map(|placement| {
                let spin = RingSpin::new(params.spin, rng.fork());
                RingMesh::new(ring.clone(), placement, params.sphere_center, spin)
            })
            .collect();

        log::info!(
            "Built planet scene: {} theme, {} sphere triangles, fov {}",
            deps.theme.name(),
            sphere.triangle_count(),
            params.fov
        );

        Ok(Self {
            params,
            palette,
            lights: LightRig::for_palette(&palette),
            camera,
            viewport: deps.viewport,
            sphere,
            sphere_yaw: 0.0,
            rings,
            env_map,
            elapsed: 0.0,
            disposed: false,
        })
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    pub fn palette(&self) -> &PlanetPalette {
        &self.palette
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn sphere(&self) -> &GeometryBuffers {
        &self.sphere
    }

    pub fn sphere_yaw(&self) -> f32 {
        self.sphere_yaw
    }

    pub fn sphere_model(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.sphere_yaw), self.params.sphere_center)
    }

    pub fn rings(&self) -> &[RingMesh] {
        &self.rings
    }

    pub fn env_map(&self) -> &EnvironmentMap {
        &self.env_map
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Scene for PlanetScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Planet
    }

    fn update(&mut self, elapsed: f32, _delta: f32) {
        if self.disposed {
            return;
        }
        self.elapsed = elapsed;
        self.sphere_yaw = elapsed * self.params.yaw_rate;
        for ring in &mut self.rings {
            ring.update(elapsed);
        }
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        viewport.ensure_nonempty()?;
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn frame(&self) -> SceneFrame<'_> {
        SceneFrame::Planet(self)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for ring in &mut self.rings {
            ring.spin.kill();
        }
        self.sphere = GeometryBuffers::default();
        for ring in &mut self.rings {
            ring.geometry = GeometryBuffers::default();
        }
        self.disposed = true;
        log::debug!("Disposed planet scene");
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RenderTier;
    use crate::theme::Theme;

    fn deps(mobile: bool) -> SceneDeps {
        SceneDeps {
            tier: RenderTier::Full,
            theme: Theme::Light,
            mobile,
            viewport: Viewport::new(1440, 900, 2.0),
            seed: 3,
        }
    }

    #[test]
    fn test_mobile_class_parameters() {
        let desktop = PlanetScene::build(&deps(false)).unwrap();
        let mobile = PlanetScene::build(&deps(true)).unwrap();
        assert_eq!(desktop.camera().fov, 45.0);
        assert_eq!(desktop.camera().position.z, 14.0);
        assert_eq!(mobile.camera().fov, 55.0);
        assert_eq!(mobile.camera().position.z, 18.0);
        assert!(desktop.params().antialias);
        assert!(!mobile.params().antialias);
        assert!(mobile.sphere().triangle_count() < desktop.sphere().triangle_count());
    }

    #[test]
    fn test_rings_hold_base_tilt_before_delay() {
        let mut scene = PlanetScene::build(&deps(false)).unwrap();
        scene.update(1.0, 0.016);
        for (ring, placement) in scene.rings().iter().zip(scene.params().rings.iter()) {
            assert!(ring.rotation().abs_diff_eq(placement.base_rotation(), 1e-5));
        }
    }

    #[test]
    fn test_rings_return_to_base_after_full_turn() {
        let mut scene = PlanetScene::build(&deps(false)).unwrap();
        scene.update(5.0, 0.016);
        let base = scene.rings()[0].base_rotation;
        assert!(!scene.rings()[0].rotation().abs_diff_eq(base, 1e-3));

        // Delay 3 + duration 7 puts the ring at rest
        scene.update(11.0, 0.016);
        let rotation = scene.rings()[0].rotation();
        assert!(rotation.abs_diff_eq(base, 1e-4) || rotation.abs_diff_eq(-base, 1e-4));
    }

    #[test]
    fn test_ring_positions_are_offset_from_sphere() {
        let scene = PlanetScene::build(&deps(false)).unwrap();
        assert_eq!(scene.rings()[0].position, Vec3::new(-0.5, -5.5, 1.0));
        assert_eq!(scene.rings()[1].position, Vec3::new(0.1, -4.5, 1.0));
    }

    #[test]
    fn test_sphere_yaw_is_time_based() {
        let mut scene = PlanetScene::build(&deps(false)).unwrap();
        scene.update(10.0, 0.016);
        assert!((scene.sphere_yaw() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_aspect_only() {
        let mut scene = PlanetScene::build(&deps(false)).unwrap();
        scene.resize(Viewport::new(800, 800, 1.0)).unwrap();
        assert_eq!(scene.camera().aspect, 1.0);
        assert_eq!(scene.camera().fov, 45.0);
        assert!(scene.resize(Viewport::new(800, 0, 1.0)).is_err());
    }

    #[test]
    fn test_dispose_stops_spin_and_frees_geometry() {
        let mut scene = PlanetScene::build(&deps(false)).unwrap();
        scene.dispose();
        assert!(scene.is_disposed());
        assert!(scene.rings().iter().all(|r| r.spin().is_killed()));
        assert_eq!(scene.sphere().vertex_count(), 0);
    }
}
