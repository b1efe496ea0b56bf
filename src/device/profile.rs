//! Device signals and the profile derived from them.
//!
//! Every platform input is optional. Absent values fall back to defaults
//! so that profile construction can never fail.

use serde::{Deserialize, Serialize};

/// Core count assumed when the platform does not report one.
pub const DEFAULT_CORES: u32 = 8;
/// Device memory (GiB) assumed when the platform does not report it.
pub const DEFAULT_MEMORY_GB: f32 = 8.0;
/// Viewport widths below this are treated as mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Network effective connection type as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectiveType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EffectiveType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::TwoG,
            "3g" => Self::ThreeG,
            "4g" => Self::FourG,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::TwoG => "2g",
            Self::ThreeG => "3g",
            Self::FourG => "4g",
            Self::Unknown => "",
        }
    }

    /// Whether this connection is slow enough to force the fallback tier.
    pub fn is_slow(&self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG)
    }
}

/// Network information object (`navigator.connection` and friends).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionInfo {
    pub save_data: Option<bool>,
    pub effective_type: Option<EffectiveType>,
}

/// Raw platform capability signals.
///
/// Field names follow the browser navigator surface so a profile can be
/// captured as JSON on the page and replayed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSignals {
    pub viewport_width: Option<u32>,
    pub hardware_concurrency: Option<u32>,
    pub device_memory: Option<f32>,
    pub connection: Option<ConnectionInfo>,
    pub moz_connection: Option<ConnectionInfo>,
    pub webkit_connection: Option<ConnectionInfo>,
    pub prefers_reduced_motion: Option<bool>,
}

impl DeviceSignals {
    /// The first available connection object, standard name first.
    pub fn active_connection(&self) -> Option<&ConnectionInfo> {
        self.connection
            .as_ref()
            .or(self.moz_connection.as_ref())
            .or(self.webkit_connection.as_ref())
    }
}

/// Device profile with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub viewport_width: u32,
    pub cores: u32,
    pub memory_gb: f32,
    pub effective_type: EffectiveType,
    pub save_data: bool,
    pub reduced_motion: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::from_signals(&DeviceSignals::default())
    }
}

impl DeviceProfile {
    /// Derive a profile from raw signals.
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let connection = signals.active_connection();
        Self {
            viewport_width: signals.viewport_width.unwrap_or(0),
            cores: signals.hardware_concurrency.unwrap_or(DEFAULT_CORES),
            memory_gb: signals.device_memory.unwrap_or(DEFAULT_MEMORY_GB),
            effective_type: connection
                .and_then(|c| c.effective_type)
                .unwrap_or_default(),
            save_data: connection.and_then(|c| c.save_data).unwrap_or(false),
            reduced_motion: signals.prefers_reduced_motion.unwrap_or(false),
        }
    }

    /// Coarse mobile classification shared by both scenes.
    ///
    /// An unknown viewport width (0) is not considered mobile.
    pub fn is_mobile(&self) -> bool {
        is_mobile(self.viewport_width, self.cores)
    }
}

/// Narrow viewport or very few cores.
pub fn is_mobile(viewport_width: u32, cores: u32) -> bool {
    (viewport_width > 0 && viewport_width < MOBILE_BREAKPOINT) || cores < 4
}
