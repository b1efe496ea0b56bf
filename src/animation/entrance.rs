//! One-shot entrance tweens for the hero layers.

use super::Ease;

/// A delayed single-value tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub delay: f32,
    pub duration: f32,
    pub from: f32,
    pub to: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(delay: f32, duration: f32, from: f32, to: f32) -> Self {
        Self {
            delay,
            duration,
            from,
            to,
            ease: Ease::CubicOut,
        }
    }

    pub fn value_at(&self, elapsed: f32) -> f32 {
        let t = if self.duration <= 0.0 {
            if elapsed >= self.delay {
                1.0
            } else {
                0.0
            }
        } else {
            (elapsed - self.delay) / self.duration
        };
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.delay + self.duration
    }
}

/// Opacity and vertical offset of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerEntrance {
    pub opacity: Tween,
    pub offset_y: Tween,
}

impl LayerEntrance {
    /// `(opacity, offset_y)` at `elapsed` seconds.
    pub fn sample(&self, elapsed: f32) -> (f32, f32) {
        (self.opacity.value_at(elapsed), self.offset_y.value_at(elapsed))
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        self.opacity.is_finished(elapsed) && self.offset_y.is_finished(elapsed)
    }

    /// Mesh background: fades in after 0.8 s over 1.2 s.
    pub fn mesh() -> Self {
        Self {
            opacity: Tween::new(0.8, 1.2, 0.0, 1.0),
            offset_y: Tween::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Planet: fades in and rises 30 px after 0.7 s over 0.6 s.
    pub fn planet() -> Self {
        Self {
            opacity: Tween::new(0.7, 0.6, 0.0, 1.0),
            offset_y: Tween::new(0.7, 0.6, 30.0, 0.0),
        }
    }

    /// Static fallback artwork: fades in after 0.7 s over 0.8 s.
    pub fn fallback() -> Self {
        Self {
            opacity: Tween::new(0.7, 0.8, 0.0, 1.0),
            offset_y: Tween::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_holds_before_delay() {
        let tween = Tween::new(1.0, 2.0, 0.0, 10.0);
        assert_eq!(tween.value_at(0.5), 0.0);
        assert_eq!(tween.value_at(3.0), 10.0);
        assert!(tween.is_finished(3.0));
        assert!(!tween.is_finished(2.9));
    }

    #[test]
    fn test_planet_entrance_rises_into_place() {
        let entrance = LayerEntrance::planet();
        let (opacity, offset) = entrance.sample(0.0);
        assert_eq!(opacity, 0.0);
        assert_eq!(offset, 30.0);

        let (opacity, offset) = entrance.sample(2.0);
        assert_eq!(opacity, 1.0);
        assert_eq!(offset, 0.0);
        assert!(entrance.is_finished(1.3));
    }

    #[test]
    fn test_mesh_fades_after_planet_starts() {
        let mesh = LayerEntrance::mesh();
        let planet = LayerEntrance::planet();
        assert_eq!(mesh.sample(0.75).0, 0.0);
        assert!(planet.sample(0.75).0 > 0.0);
    }
}
