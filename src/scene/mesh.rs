//! Mesh scene: a gently oscillating node field with proximity connections.
//!
//! Nodes are laid out on a jittered grid that covers the visible frustum
//! slice at z = 0 plus a margin. Every frame each node drifts around its base
//! position on a phase-shifted sinusoid and the connection pass rebuilds the
//! line buffer.

use super::{
    connect_nodes, LineBuffer, PerspectiveCamera, Scene, SceneDeps, SceneError, SceneFrame,
    SceneKind, Viewport,
};
use crate::rng::Rng;
use crate::theme::MeshPalette;
use glam::Vec3;

/// Mesh scene parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    pub fov: f32,
    pub camera_z: f32,
    pub camera_y: f32,
    pub near: f32,
    pub far: f32,
    pub node_count: usize,
    pub connection_distance: f32,
    pub node_size: f32,
    /// Extra width added to the visible frustum slice.
    pub margin: f32,
    pub region_bottom: f32,
    pub region_top: f32,
    /// Fraction of a grid cell each node may be displaced.
    pub jitter: f32,
    /// Phase speed of the drift, radians per second.
    pub time_scale: f32,
    /// Line budget per node.
    pub lines_per_node: usize,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self::for_class(false)
    }
}

impl MeshParams {
    pub fn for_class(mobile: bool) -> Self {
        Self {
            fov: 50.0,
            camera_z: 30.0,
            camera_y: if mobile { 4.0 } else { 0.0 },
            near: 0.1,
            far: 1000.0,
            node_count: if mobile { 80 } else { 200 },
            connection_distance: if mobile { 6.0 } else { 5.0 },
            node_size: if mobile { 0.03 } else { 0.05 },
            margin: 8.0,
            region_bottom: -10.0,
            region_top: if mobile { 14.0 } else { 10.0 },
            jitter: 0.4,
            time_scale: 0.3,
            lines_per_node: 6,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.node_count * self.lines_per_node
    }

    /// Rendered node diameter in pixels at `depth` units from the camera.
    pub fn point_size(&self, depth: f32) -> f32 {
        self.node_size * 100.0 * (300.0 / depth.max(1e-3))
    }
}

/// A point in the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub base: Vec3,
    pub position: Vec3,
    /// Carried for styling only, never integrated.
    pub velocity: Vec3,
}

/// Mesh scene state.
#[derive(Debug)]
pub struct MeshScene {
    params: MeshParams,
    palette: MeshPalette,
    camera: PerspectiveCamera,
    viewport: Viewport,
    nodes: Vec<Node>,
    positions: Vec<Vec3>,
    lines: LineBuffer,
    line_count: usize,
    elapsed: f32,
    disposed: bool,
}

impl MeshScene {
    pub fn build(deps: &SceneDeps) -> Result<Self, SceneError> {
        Self::with_params(deps, MeshParams::for_class(deps.mobile))
    }

    pub fn with_params(deps: &SceneDeps, params: MeshParams) -> Result<Self, SceneError> {
        deps.viewport.ensure_nonempty()?;

        let camera = PerspectiveCamera::new(params.fov, deps.viewport.aspect(), params.near, params.far)
            .look_at(
                Vec3::new(0.0, params.camera_y, params.camera_z),
                Vec3::new(0.0, params.camera_y, 0.0),
            );

        let width = camera.visible_width_at(params.camera_z) + params.margin;
        let mut rng = Rng::new(deps.seed);
        let nodes = layout_nodes(&params, width, &mut rng);
        let positions = nodes.iter().map(|n| n.position).collect();

        log::info!(
            "Built mesh scene: {} nodes over {:.1} units, {} theme",
            nodes.len(),
            width,
            deps.theme.name()
        );

        let mut scene = Self {
            params,
            palette: MeshPalette::for_theme(deps.theme),
            camera,
            viewport: deps.viewport,
            nodes,
            positions,
            lines: LineBuffer::new(params.max_lines()),
            line_count: 0,
            elapsed: 0.0,
            disposed: false,
        };
        scene.line_count = connect_nodes(&scene.positions, params.connection_distance, &mut scene.lines);
        Ok(scene)
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    pub fn palette(&self) -> &MeshPalette {
        &self.palette
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Current node positions in index order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    /// Number of live segments at the front of the line buffer.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Drift offset of node `index` at phase `t`.
pub fn drift(index: usize, t: f32) -> Vec3 {
    let i = index as f32;
    Vec3::new(
        (t + i * 0.5).sin() * 0.15,
        (t * 0.8 + i * 0.3).cos() * 0.15,
        (t * 0.6 + i * 0.7).sin() * 0.1,
    )
}

fn layout_nodes(params: &MeshParams, width: f32, rng: &mut Rng) -> Vec<Node> {
    let count = params.node_count;
    if count == 0 {
        return Vec::new();
    }
    let height = params.region_top - params.region_bottom;
    let cols = ((count as f32 * width / height).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);
    let cell_w = width / cols as f32;
    let cell_h = height / rows as f32;
    let col_span = (cols.saturating_sub(1)).max(1) as f32;
    let row_span = (rows.saturating_sub(1)).max(1) as f32;

    (0..count)
        .map(|index| {
            let col = index % cols;
            let row = index / cols;
            let x = -width / 2.0 + col as f32 / col_span * width + rng.centered() * cell_w * params.jitter * 2.0;
            let y = params.region_bottom
                + row as f32 / row_span * height
                + rng.centered() * cell_h * params.jitter * 2.0;
            let mut z = -3.0 + rng.centered() * 8.0;
            if y < -8.0 {
                z = -5.0 + rng.centered() * 4.0;
            }
            let velocity = Vec3::new(
                rng.centered() * 0.01,
                rng.centered() * 0.01,
                rng.centered() * 0.01,
            );
            let base = Vec3::new(x, y, z);
            Node {
                base,
                position: base,
                velocity,
            }
        })
        .collect()
}

impl Scene for MeshScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Mesh
    }

    fn update(&mut self, elapsed: f32, _delta: f32) {
        if self.disposed {
            return;
        }
        self.elapsed = elapsed;
        let t = elapsed * self.params.time_scale;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.position = node.base + drift(index, t);
            self.positions[index] = node.position;
        }
        self.line_count = connect_nodes(&self.positions, self.params.connection_distance, &mut self.lines);
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
        SceneFrame::Mesh(self)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.nodes.clear();
        self.positions.clear();
        self.lines = LineBuffer::new(0);
        self.line_count = 0;
        self.disposed = true;
        log::debug!("Disposed mesh scene");
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
            theme: Theme::Dark,
            mobile,
            viewport: Viewport::new(1600, 900, 1.0),
            seed: 11,
        }
    }

    #[test]
    fn test_node_counts_by_class() {
        assert_eq!(MeshScene::build(&deps(false)).unwrap().nodes().len(), 200);
        assert_eq!(MeshScene::build(&deps(true)).unwrap().nodes().len(), 80);
    }

    #[test]
    fn test_line_budget() {
        let scene = MeshScene::build(&deps(false)).unwrap();
        assert_eq!(scene.lines().capacity(), 1200);
        assert!(scene.line_count() <= 1200);
    }

    #[test]
    fn test_nodes_cover_region() {
        let scene = MeshScene::build(&deps(false)).unwrap();
        let params = scene.params();
        let width = scene.camera().visible_width_at(params.camera_z) + params.margin;
        for node in scene.nodes() {
            assert!(node.base.x.abs() <= width / 2.0 + width);
            assert!(node.base.y >= params.region_bottom - 3.0);
            assert!(node.base.y <= params.region_top + 3.0);
            if node.base.y < -8.0 {
                assert!(node.base.z >= -7.0 && node.base.z <= -3.0);
            } else {
                assert!(node.base.z >= -7.0 && node.base.z <= 1.0);
            }
        }
    }

    #[test]
    fn test_drift_is_bounded() {
        let mut scene = MeshScene::build(&deps(false)).unwrap();
        scene.update(37.0, 0.016);
        for node in scene.nodes() {
            let offset = node.position - node.base;
            assert!(offset.x.abs() <= 0.15 + 1e-6);
            assert!(offset.y.abs() <= 0.15 + 1e-6);
            assert!(offset.z.abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn test_drift_phases() {
        let offset = drift(0, 0.0);
        assert_eq!(offset, Vec3::new(0.0, 0.15, 0.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = MeshScene::build(&deps(false)).unwrap();
        let b = MeshScene::build(&deps(false)).unwrap();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_point_size_falls_off_with_depth() {
        let params = MeshParams::for_class(false);
        assert!((params.point_size(30.0) - 50.0).abs() < 1e-4);
        assert!(params.point_size(60.0) < params.point_size(30.0));
    }

    #[test]
    fn test_mobile_camera_offset() {
        let scene = MeshScene::build(&deps(true)).unwrap();
        assert_eq!(scene.camera().position.y, 4.0);
        assert_eq!(scene.camera().target.y, 4.0);
    }
}
