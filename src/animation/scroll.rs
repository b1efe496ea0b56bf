//! Scroll-linked parallax.
//!
//! Scroll position maps to a normalized progress, and progress maps to the
//! container style. Both are pure so they can be tested without a page.
//! A scrub smoother follows the target progress with a fixed lag.

/// Viewport-relative trigger window for the container's top edge.
///
/// Values are fractions of the viewport height measured from its top. The
/// default window starts when the top edge reaches 20% and ends at -30%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub start: f32,
    pub end: f32,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self {
            start: 0.2,
            end: -0.3,
        }
    }
}

impl ScrollTrigger {
    /// Progress in `[0, 1]` for a container whose top edge sits at
    /// `element_top` pixels relative to the viewport top.
    pub fn progress(&self, element_top: f32, viewport_height: f32) -> f32 {
        if viewport_height <= 0.0 {
            return 0.0;
        }
        let start_px = self.start * viewport_height;
        let end_px = self.end * viewport_height;
        let span = start_px - end_px;
        if span.abs() < f32::EPSILON {
            return if element_top <= end_px { 1.0 } else { 0.0 };
        }
        ((start_px - element_top) / span).clamp(0.0, 1.0)
    }
}

/// Style applied to the scene container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxStyle {
    pub opacity: f32,
    /// Downward translation in pixels.
    pub translate_y: f32,
}

impl Default for ParallaxStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_y: 0.0,
        }
    }
}

/// Fraction of viewport height travelled at full progress.
pub const PARALLAX_TRAVEL: f32 = 0.3;

/// Linear fade-out and slide-down.
pub fn parallax_style(progress: f32, viewport_height: f32) -> ParallaxStyle {
    let p = progress.clamp(0.0, 1.0);
    ParallaxStyle {
        opacity: 1.0 - p,
        translate_y: p * PARALLAX_TRAVEL * viewport_height.max(0.0),
    }
}

/// Follows a target progress, catching up over `lag` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubSmoother {
    lag: f32,
    value: f32,
    target: f32,
}

impl ScrubSmoother {
    pub fn new(lag: f32) -> Self {
        Self {
            lag: lag.max(0.0),
            value: 0.0,
            target: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < 1e-4
    }

    /// Advance by `dt` seconds and return the smoothed value.
    pub fn update(&mut self, dt: f32) -> f32 {
        if self.lag == 0.0 {
            self.value = self.target;
            return self.value;
        }
        let alpha = (dt.max(0.0) / self.lag).min(1.0);
        self.value += (self.target - self.value) * alpha;
        if self.is_settled() {
            self.value = self.target;
        }
        self.value
    }
}

impl Default for ScrubSmoother {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_window() {
        let trigger = ScrollTrigger::default();
        let vh = 1000.0;
        assert_eq!(trigger.progress(500.0, vh), 0.0);
        assert_eq!(trigger.progress(200.0, vh), 0.0);
        assert!((trigger.progress(-50.0, vh) - 0.5).abs() < 1e-5);
        assert_eq!(trigger.progress(-300.0, vh), 1.0);
        assert_eq!(trigger.progress(-900.0, vh), 1.0);
    }

    #[test]
    fn test_zero_viewport_is_start() {
        assert_eq!(ScrollTrigger::default().progress(-100.0, 0.0), 0.0);
    }

    #[test]
    fn test_parallax_style_endpoints() {
        let start = parallax_style(0.0, 800.0);
        assert_eq!(start, ParallaxStyle::default());

        let end = parallax_style(1.0, 800.0);
        assert_eq!(end.opacity, 0.0);
        assert!((end.translate_y - 240.0).abs() < 1e-4);

        let mid = parallax_style(0.5, 800.0);
        assert!((mid.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_scrub_catches_up_after_lag() {
        let mut scrub = ScrubSmoother::new(1.0);
        scrub.set_target(1.0);
        let partial = scrub.update(0.25);
        assert!(partial > 0.0 && partial < 1.0);
        scrub.update(1.0);
        assert!(scrub.is_settled());
        assert_eq!(scrub.value(), 1.0);
    }

    #[test]
    fn test_zero_lag_is_immediate() {
        let mut scrub = ScrubSmoother::new(0.0);
        scrub.set_target(0.7);
        assert!((scrub.update(0.0) - 0.7).abs() < 1e-6);
    }
}
