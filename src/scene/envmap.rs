//! Synthetic environment map for the ring material.
//!
//! No environment capture exists, so reflections sample a small vertical
//! gradient: top color, a bright middle band between 40% and 60%, and a dark
//! bottom. The texture is mapped equirectangularly in the ring shader.

use super::SceneError;
use image::{Rgba, RgbaImage};

/// Default edge length of the environment texture.
pub const ENV_MAP_SIZE: u32 = 64;

/// Gradient stops as (offset, color index into the 3-color gradient).
const STOPS: [(f32, usize); 4] = [(0.0, 0), (0.4, 1), (0.6, 1), (1.0, 2)];

/// CPU-side environment texture.
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    image: RgbaImage,
}

impl EnvironmentMap {
    /// Generate the gradient texture.
    pub fn generate(size: u32, gradient: &[[f32; 3]; 3]) -> Result<Self, SceneError> {
        if size == 0 {
            return Err(SceneError::EnvMap("texture size must be non-zero".into()));
        }
        if gradient.iter().flatten().any(|c| !c.is_finite()) {
            return Err(SceneError::EnvMap("gradient contains non-finite color".into()));
        }

        let mut image = RgbaImage::new(size, size);
        for y in 0..size {
            // Sample at pixel centers like a canvas fill
            let t = (y as f32 + 0.5) / size as f32;
            let color = sample_gradient(t, gradient);
            let pixel = Rgba([
                to_u8(color[0]),
                to_u8(color[1]),
                to_u8(color[2]),
                255,
            ]);
            for x in 0..size {
                image.put_pixel(x, y, pixel);
            }
        }

        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Tightly packed RGBA8 rows.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

fn sample_gradient(t: f32, gradient: &[[f32; 3]; 3]) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let a = gradient[c0];
            let b = gradient[c1];
            return [
                a[0] + (b[0] - a[0]) * f,
                a[1] + (b[1] - a[1]) * f,
                a[2] + (b[2] - a[2]) * f,
            ];
        }
    }
    gradient[2]
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{PlanetPalette, Theme};

    #[test]
    fn test_generates_square_texture() {
        let palette = PlanetPalette::for_theme(Theme::Light);
        let map = EnvironmentMap::generate(ENV_MAP_SIZE, &palette.env_gradient).unwrap();
        assert_eq!(map.width(), 64);
        assert_eq!(map.height(), 64);
        assert_eq!(map.pixels().len(), 64 * 64 * 4);
    }

    #[test]
    fn test_middle_band_is_flat() {
        let gradient = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5, 0.5, 0.5]];
        let map = EnvironmentMap::generate(100, &gradient).unwrap();
        let row = |y: u32| map.image().get_pixel(0, y).0;
        assert_eq!(row(45), [255, 255, 255, 255]);
        assert_eq!(row(55), [255, 255, 255, 255]);
        assert!(row(5)[0] < row(30)[0]);
        assert!(row(95)[0] < 255);
    }

    #[test]
    fn test_rows_are_uniform() {
        let palette = PlanetPalette::for_theme(Theme::Dark);
        let map = EnvironmentMap::generate(16, &palette.env_gradient).unwrap();
        for y in 0..16 {
            let first = map.image().get_pixel(0, y);
            assert!((0..16).all(|x| map.image().get_pixel(x, y) == first));
        }
    }

    #[test]
    fn test_zero_size_fails() {
        let palette = PlanetPalette::for_theme(Theme::Dark);
        assert!(matches!(
            EnvironmentMap::generate(0, &palette.env_gradient),
            Err(SceneError::EnvMap(_))
        ));
    }
}
