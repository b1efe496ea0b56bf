//! Easing curves.

use std::f32::consts::PI;

/// Easing curve applied to a normalized progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    CubicOut,
}

impl Ease {
    /// Map `t` in `[0, 1]` to eased progress. Input is clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SineIn => 1.0 - (t * PI * 0.5).cos(),
            Self::SineOut => (t * PI * 0.5).sin(),
            Self::SineInOut => -((PI * t).cos() - 1.0) * 0.5,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::SineIn,
        Ease::SineOut,
        Ease::SineInOut,
        Ease::CubicOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-6, "{:?}", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", ease);
        }
    }

    #[test]
    fn test_monotonic() {
        for ease in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev, "{:?} not monotonic at {}", ease, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_sine_in_out_is_symmetric() {
        let ease = Ease::SineInOut;
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((ease.apply(0.25) + ease.apply(0.75) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::Linear.apply(2.0), 1.0);
    }
}
