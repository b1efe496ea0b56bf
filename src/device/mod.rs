//! Device capability detection and render tier classification.
//!
//! This module provides:
//! - Optional platform signals with navigator-style JSON keys
//! - A defaulted device profile and coarse mobile classification
//! - A reactive classifier that publishes only on tier changes
//! - A reduced-motion flag mirrored from the tier

pub mod classifier;
pub mod profile;

pub use classifier::{classify, MotionFlag, RenderTier, SignalChange, TierClassifier, TierObserver};
pub use profile::{
    is_mobile, ConnectionInfo, DeviceProfile, DeviceSignals, EffectiveType, DEFAULT_CORES,
    DEFAULT_MEMORY_GB, MOBILE_BREAKPOINT,
};
