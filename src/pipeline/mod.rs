//! Headless hero pipeline: config, classify, run the stage, write PNG frames.

mod composite;

pub use composite::Canvas;

use crate::device::{DeviceSignals, RenderTier, TierClassifier};
use crate::gpu::{check_layer_size, GpuContext, GpuError, GpuSurfaceFactory};
use crate::runtime::{fallback_art_path, HeroStage, StageEvent, SurfaceError};
use crate::scene::{SceneError, Viewport};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Scroll position of the hero container at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollKey {
    /// Seconds from the start of the render.
    pub time: f32,
    /// Container top edge relative to the viewport top, in CSS pixels.
    pub element_top: f32,
}

/// Pipeline configuration, loadable from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub fps: u32,
    /// Seconds of animation to render.
    pub duration: f32,
    pub theme: Theme,
    pub signals: DeviceSignals,
    /// Keyframes interpolated linearly; empty means no scrolling.
    pub scroll: Vec<ScrollKey>,
    pub seed: u32,
    /// Page background as hex; the theme's page colour when unset.
    pub background: Option<String>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            pixel_ratio: 1.0,
            fps: 30,
            duration: 3.0,
            theme: Theme::Dark,
            signals: DeviceSignals::default(),
            scroll: Vec::new(),
            seed: 1,
            background: None,
        }
    }
}

impl HeroConfig {
    /// Load a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.pixel_ratio)
    }

    pub fn total_frames(&self) -> usize {
        (self.duration.max(0.0) * self.fps as f32).ceil() as usize
    }

    /// Timestamp of frame `index`.
    pub fn frame_time(&self, index: usize) -> Duration {
        Duration::from_secs_f64(index as f64 / self.fps.max(1) as f64)
    }

    /// Background colour as RGB floats.
    pub fn background_rgb(&self) -> Result<[f32; 3], PipelineError> {
        match &self.background {
            Some(hex) => parse_hex_color(hex).ok_or_else(|| PipelineError::InvalidColor(hex.clone())),
            None => Ok(page_background(self.theme)),
        }
    }

    /// Container top at `time`, or `None` without scroll keys.
    pub fn scroll_at(&self, time: f32) -> Option<f32> {
        let first = self.scroll.first()?;
        if time <= first.time {
            return Some(first.element_top);
        }
        for pair in self.scroll.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return Some(b.element_top);
                }
                let t = (time - a.time) / span;
                return Some(a.element_top + (b.element_top - a.element_top) * t);
            }
        }
        self.scroll.last().map(|key| key.element_top)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.fps == 0 {
            return Err(PipelineError::InvalidConfig("fps must be positive".into()));
        }
        self.viewport().ensure_nonempty()?;
        Ok(())
    }
}

/// Page background behind the hero for each theme.
pub fn page_background(theme: Theme) -> [f32; 3] {
    match theme {
        Theme::Dark => crate::theme::rgb(0x0a0a0f),
        Theme::Light => crate::theme::rgb(0xffffff),
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Parse hex color to RGB floats (accepts 6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()? as f32 / 255.0;
    Some([r, g, b])
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub tier: RenderTier,
    pub frames_written: usize,
    pub width: u32,
    pub height: u32,
    pub files: Vec<PathBuf>,
    /// Static artwork path when the fallback tier was chosen.
    pub fallback_art: Option<String>,
}

/// Render the hero to numbered PNG frames in `out_dir`.
///
/// On the fallback tier nothing is drawn and the summary names the static
/// artwork instead.
pub async fn render_hero<P: AsRef<Path>>(
    config: &HeroConfig,
    out_dir: P,
    progress_callback: Option<Box<dyn Fn(f32) + Send>>,
) -> Result<RenderSummary, PipelineError> {
    config.validate()?;
    let background = config.background_rgb()?;
    let viewport = config.viewport();
    let (width, height) = viewport.physical_size();

    let signals = DeviceSignals {
        viewport_width: Some(viewport.width),
        ..config.signals.clone()
    };
    let mut classifier = TierClassifier::new(signals);
    classifier.evaluate();
    let tier = classifier.current();
    log::info!("Hero tier: {}", tier.name());
    if tier == RenderTier::Fallback {
        return Ok(RenderSummary {
            tier,
            frames_written: 0,
            width,
            height,
            files: Vec::new(),
            fallback_art: Some(fallback_art_path(viewport.width, config.theme)),
        });
    }

    let ctx = Arc::new(GpuContext::new().await?);
    check_layer_size(viewport, ctx.max_layer_size())
        .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
    let factory = GpuSurfaceFactory::new(ctx);
    let mut stage = HeroStage::new(
        config.signals.clone(),
        config.theme,
        viewport,
        config.seed,
        factory,
    );
    stage.mount(Duration::ZERO);

    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let total_frames = config.total_frames();
    let mut canvas = Canvas::new(width, height, background);
    let mut files = Vec::with_capacity(total_frames);

    for frame_idx in 0..total_frames {
        let now = config.frame_time(frame_idx);
        if let Some(element_top) = config.scroll_at(now.as_secs_f32()) {
            stage.handle(StageEvent::Scroll { element_top }, now);
        }

        let frame = stage.on_frame(now);
        canvas.clear();
        if frame.mesh_drawn {
            if let Some(surface) = stage.mesh().surface() {
                canvas.draw_layer(&surface.read_layer()?);
            }
        }
        if frame.planet_drawn {
            if let Some(surface) = stage.planet().surface() {
                canvas.draw_layer(&surface.read_layer()?);
            }
        }

        let path = out_dir.join(format!("frame_{:05}.png", frame_idx));
        canvas.image().save(&path)?;
        files.push(path);

        if let Some(ref callback) = progress_callback {
            callback((frame_idx + 1) as f32 / total_frames as f32);
        }
    }

    stage.unmount();
    log::info!("Wrote {} frames to {}", files.len(), out_dir.display());

    Ok(RenderSummary {
        tier,
        frames_written: files.len(),
        width,
        height,
        files,
        fallback_art: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00ff88"), Some([0.0, 1.0, 136.0 / 255.0]));
        assert_eq!(parse_hex_color("ffffff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_hex_color("#00000000"), Some([0.0, 0.0, 0.0]));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_hero_config_default() {
        let config = HeroConfig::default();
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert_eq!(config.fps, 30);
        assert_eq!(config.total_frames(), 90);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = HeroConfig::from_json(
            r##"{"width": 800, "theme": "light", "background": "#112233",
                "signals": {"hardwareConcurrency": 2}}"##,
        )
        .unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 1080);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.signals.hardware_concurrency, Some(2));
        let bg = config.background_rgb().unwrap();
        assert!((bg[0] - 0x11 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_background_is_error() {
        let config = HeroConfig {
            background: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.background_rgb(),
            Err(PipelineError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_background_follows_theme() {
        let light = HeroConfig {
            theme: Theme::Light,
            ..Default::default()
        };
        assert_eq!(light.background_rgb().unwrap(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_scroll_interpolation() {
        let config = HeroConfig {
            scroll: vec![
                ScrollKey { time: 1.0, element_top: 0.0 },
                ScrollKey { time: 3.0, element_top: -400.0 },
            ],
            ..Default::default()
        };
        assert_eq!(config.scroll_at(0.0), Some(0.0));
        assert_eq!(config.scroll_at(2.0), Some(-200.0));
        assert_eq!(config.scroll_at(9.0), Some(-400.0));
        assert_eq!(HeroConfig::default().scroll_at(1.0), None);
    }

    #[test]
    fn test_validate_rejects_zero_fps_and_empty_viewport() {
        let zero_fps = HeroConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(zero_fps.validate(), Err(PipelineError::InvalidConfig(_))));

        let empty = HeroConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(PipelineError::Scene(_))));
    }

    #[test]
    fn test_frame_time() {
        let config = HeroConfig::default();
        assert_eq!(config.frame_time(0), Duration::ZERO);
        assert_eq!(config.frame_time(30), Duration::from_secs(1));
    }
}
