//! Render tier classification.

use super::profile::{ConnectionInfo, DeviceProfile, DeviceSignals};
use serde::{Deserialize, Serialize};

/// Rendering quality level chosen for the current device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTier {
    /// Live WebGPU scenes.
    Full,
    /// Static artwork, no render loop.
    #[default]
    Fallback,
}

impl RenderTier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Fallback => "fallback",
        }
    }
}

/// Classify a profile. Any low-end signal forces the fallback tier.
pub fn classify(profile: &DeviceProfile) -> RenderTier {
    let low_end = profile.reduced_motion
        || profile.memory_gb <= 4.0
        || profile.cores <= 4
        || profile.save_data
        || profile.effective_type.is_slow();

    if low_end {
        RenderTier::Fallback
    } else {
        RenderTier::Full
    }
}

/// Receives tier changes from a [`TierClassifier`].
pub trait TierObserver {
    fn tier_changed(&mut self, tier: RenderTier);
}

/// Document-level reduced-motion flag mirrored from the tier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MotionFlag {
    reduced_motion: bool,
}

impl MotionFlag {
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Attribute value as written on the root element.
    pub fn attribute_value(&self) -> &'static str {
        if self.reduced_motion {
            "true"
        } else {
            "false"
        }
    }
}

impl TierObserver for MotionFlag {
    fn tier_changed(&mut self, tier: RenderTier) {
        self.reduced_motion = tier == RenderTier::Fallback;
    }
}

/// A platform change event that should trigger re-classification.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalChange {
    Viewport(u32),
    ReducedMotion(bool),
    Connection(Option<ConnectionInfo>),
}

/// Reactive tier classifier with a no-op guard on unchanged results.
pub struct TierClassifier {
    signals: DeviceSignals,
    last: RenderTier,
    motion_flag: MotionFlag,
    observers: Vec<Box<dyn TierObserver>>,
}

impl TierClassifier {
    pub fn new(signals: DeviceSignals) -> Self {
        Self {
            signals,
            last: RenderTier::Fallback,
            motion_flag: MotionFlag {
                reduced_motion: true,
            },
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is not notified of the current tier.
    pub fn subscribe(&mut self, observer: Box<dyn TierObserver>) {
        self.observers.push(observer);
    }

    /// Last published tier. Starts at fallback, so a first evaluation that
    /// also yields fallback publishes nothing.
    pub fn current(&self) -> RenderTier {
        self.last
    }

    pub fn signals(&self) -> &DeviceSignals {
        &self.signals
    }

    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile::from_signals(&self.signals)
    }

    pub fn motion_flag(&self) -> MotionFlag {
        self.motion_flag
    }

    /// Re-evaluate the stored signals.
    ///
    /// Returns the new tier only when it differs from the last published one.
    pub fn evaluate(&mut self) -> Option<RenderTier> {
        let next = classify(&self.profile());
        if self.last == next {
            return None;
        }

        log::info!("Render tier {} -> {}", self.last.name(), next.name());
        self.last = next;
        self.motion_flag.tier_changed(next);
        for observer in &mut self.observers {
            observer.tier_changed(next);
        }
        Some(next)
    }

    /// Replace all signals and re-evaluate.
    pub fn update(&mut self, signals: DeviceSignals) -> Option<RenderTier> {
        self.signals = signals;
        self.evaluate()
    }

    /// Apply a single change event and re-evaluate.
    pub fn apply(&mut self, change: SignalChange) -> Option<RenderTier> {
        match change {
            SignalChange::Viewport(width) => self.signals.viewport_width = Some(width),
            SignalChange::ReducedMotion(reduced) => {
                self.signals.prefers_reduced_motion = Some(reduced)
            }
            SignalChange::Connection(connection) => {
                self.signals.connection = connection;
                self.signals.moz_connection = None;
                self.signals.webkit_connection = None;
            }
        }
        self.evaluate()
    }
}
