//! Fixed lighting rig for the planet scene.

use crate::theme::{rgb, PlanetPalette};
use glam::Vec3;

/// Directional light aimed at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    pub fn new(color: [f32; 3], intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            position,
        }
    }

    /// Unit vector pointing from the surface toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }

    /// Color premultiplied by intensity.
    pub fn radiance(&self) -> [f32; 3] {
        [
            self.color[0] * self.intensity,
            self.color[1] * self.intensity,
            self.color[2] * self.intensity,
        ]
    }
}

/// Ambient light plus key, fill, rim, and theme-dependent top light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub rim: DirectionalLight,
    pub top: DirectionalLight,
}

impl LightRig {
    pub fn for_palette(palette: &PlanetPalette) -> Self {
        Self {
            ambient: rgb(0xffffff),
            ambient_intensity: 0.2,
            key: DirectionalLight::new(rgb(0xffffff), 1.0, Vec3::new(5.0, 8.0, 10.0)),
            fill: DirectionalLight::new(rgb(0x8899aa), 0.5, Vec3::new(-8.0, 2.0, 5.0)),
            rim: DirectionalLight::new(rgb(0xffffff), 0.4, Vec3::new(0.0, -5.0, -10.0)),
            top: DirectionalLight::new(
                palette.top_light,
                palette.top_light_intensity,
                Vec3::new(0.0, 15.0, 5.0),
            ),
        }
    }

    pub fn directional(&self) -> [DirectionalLight; 4] {
        [self.key, self.fill, self.rim, self.top]
    }

    pub fn ambient_radiance(&self) -> [f32; 3] {
        [
            self.ambient[0] * self.ambient_intensity,
            self.ambient[1] * self.ambient_intensity,
            self.ambient[2] * self.ambient_intensity,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_top_light_follows_theme() {
        let dark = LightRig::for_palette(&PlanetPalette::for_theme(Theme::Dark));
        let light = LightRig::for_palette(&PlanetPalette::for_theme(Theme::Light));
        assert_eq!(dark.top.intensity, 0.5);
        assert_eq!(light.top.intensity, 0.7);
        assert_eq!(dark.key, light.key);
    }

    #[test]
    fn test_directions_are_normalized() {
        let rig = LightRig::for_palette(&PlanetPalette::for_theme(Theme::Light));
        for light in rig.directional() {
            assert!((light.direction().length() - 1.0).abs() < 1e-5);
        }
    }
}
