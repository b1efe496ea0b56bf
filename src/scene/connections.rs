//! Proximity connections between mesh nodes.

use glam::Vec3;

/// Line endpoint with a fade factor.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub alpha: f32,
}

/// Fixed-capacity segment buffer, two vertices per segment.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    vertices: Vec<LineVertex>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: vec![LineVertex::default(); capacity * 2],
            capacity,
        }
    }

    /// Maximum number of segments.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    /// Segment `index` as its two endpoints.
    pub fn segment(&self, index: usize) -> Option<(LineVertex, LineVertex)> {
        if index >= self.capacity {
            return None;
        }
        Some((self.vertices[index * 2], self.vertices[index * 2 + 1]))
    }

    fn write(&mut self, index: usize, a: Vec3, b: Vec3, alpha: f32) {
        self.vertices[index * 2] = LineVertex {
            position: a.to_array(),
            alpha,
        };
        self.vertices[index * 2 + 1] = LineVertex {
            position: b.to_array(),
            alpha,
        };
    }
}

/// Rebuild connections for the current node positions.
///
/// Every unordered pair closer than `threshold` becomes a segment whose
/// alpha fades linearly from 1 at zero distance to 0 at the threshold.
/// Pairs are visited with `i < j` in index order and the scan stops once the
/// buffer is full. Slots past the returned count are zeroed so stale
/// segments never render.
pub fn connect_nodes(positions: &[Vec3], threshold: f32, out: &mut LineBuffer) -> usize {
    let capacity = out.capacity();
    let threshold_sq = threshold * threshold;
    let mut count = 0;

    'scan: for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if count >= capacity {
                break 'scan;
            }
            let distance_sq = positions[i].distance_squared(positions[j]);
            if distance_sq < threshold_sq {
                let alpha = 1.0 - distance_sq.sqrt() / threshold;
                out.write(count, positions[i], positions[j], alpha);
                count += 1;
            }
        }
    }

    for slot in &mut out.vertices[count * 2..] {
        *slot = LineVertex::default();
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_close_pairs_connect() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
        ];
        let mut lines = LineBuffer::new(10);
        assert_eq!(connect_nodes(&positions, 6.0, &mut lines), 1);
        let (a, b) = lines.segment(0).unwrap();
        assert_eq!(a.position, [0.0, 0.0, 0.0]);
        assert_eq!(b.position, [3.0, 0.0, 0.0]);
        assert!((a.alpha - 0.5).abs() < 1e-6);
        assert_eq!(a.alpha, b.alpha);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let positions = [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)];
        let mut lines = LineBuffer::new(4);
        assert_eq!(connect_nodes(&positions, 5.0, &mut lines), 0);
    }

    #[test]
    fn test_budget_clips_in_index_order() {
        let positions = vec![Vec3::ZERO; 5];
        let mut lines = LineBuffer::new(3);
        assert_eq!(connect_nodes(&positions, 1.0, &mut lines), 3);
        assert!(lines.vertices().iter().all(|v| v.alpha == 1.0));
    }

    #[test]
    fn test_unused_slots_are_zeroed() {
        let mut lines = LineBuffer::new(4);
        let close = vec![Vec3::ZERO; 4];
        assert_eq!(connect_nodes(&close, 1.0, &mut lines), 4);

        let apart = [Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)];
        assert_eq!(connect_nodes(&apart, 1.0, &mut lines), 1);
        for index in 1..4 {
            let (a, b) = lines.segment(index).unwrap();
            assert_eq!(a, LineVertex::default());
            assert_eq!(b, LineVertex::default());
        }
    }
}
