//! Theme resolution and the color palettes both scenes read at build time.

use serde::{Deserialize, Serialize};

/// Resolved page theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Resolve an optional theme, deferring to the system preference.
    pub fn resolve(resolved: Option<Theme>, system_prefers_dark: bool) -> Self {
        match resolved {
            Some(theme) => theme,
            None if system_prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Self::Dark
    }
}

/// Convert a packed `0xRRGGBB` value to RGB floats.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Planet scene colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetPalette {
    pub sphere_top: [f32; 3],
    pub sphere_bottom: [f32; 3],
    pub sphere_glow: [f32; 3],
    pub fresnel_intensity: f32,
    pub top_light: [f32; 3],
    pub top_light_intensity: f32,
    pub ring_color: [f32; 3],
    pub ring_roughness: f32,
    pub env_map_intensity: f32,
    /// Environment gradient: top, middle band, bottom.
    pub env_gradient: [[f32; 3]; 3],
}

impl PlanetPalette {
    /// Dark mode uses muted colors throughout.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                sphere_top: rgb(0x2a4a80),
                sphere_bottom: rgb(0x0f1f30),
                sphere_glow: rgb(0x3a5a90),
                fresnel_intensity: 0.2,
                top_light: rgb(0x5a6a80),
                top_light_intensity: 0.5,
                ring_color: rgb(0x909090),
                ring_roughness: 0.25,
                env_map_intensity: 0.3,
                env_gradient: [rgb(0x556677), rgb(0x8899aa), rgb(0x223344)],
            },
            Theme::Light => Self {
                sphere_top: rgb(0x1e4fd0),
                sphere_bottom: rgb(0x0a2440),
                sphere_glow: rgb(0x2d6ae0),
                fresnel_intensity: 0.3,
                top_light: rgb(0x4a90d9),
                top_light_intensity: 0.7,
                ring_color: rgb(0xc0c0c0),
                ring_roughness: 0.2,
                env_map_intensity: 0.5,
                env_gradient: [rgb(0x778899), rgb(0xffffff), rgb(0x334455)],
            },
        }
    }
}

/// Mesh scene colors and opacity multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPalette {
    pub color: [f32; 3],
    pub node_alpha: f32,
    pub line_alpha: f32,
}

impl MeshPalette {
    /// Brighter on dark backgrounds, muted gray on light ones.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                color: rgb(0xffffff),
                node_alpha: 0.35,
                line_alpha: 0.9,
            },
            Theme::Light => Self {
                color: rgb(0x4b5563),
                node_alpha: 0.2,
                line_alpha: 0.7,
            },
        }
    }
}
