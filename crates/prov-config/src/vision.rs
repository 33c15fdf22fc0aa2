//! Vision-first pipeline toggles.

use serde::{Deserialize, Serialize};

use crate::FeatureToggles;

const fn default_enabled() -> bool {
    true
}

const fn default_threshold() -> u8 {
    70
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisionConfig {
    /// Run image analysis before ownership research.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minimum vision confidence (0–100) for the extraction to be trusted.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: u8,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            confidence_threshold: default_threshold(),
        }
    }
}

impl FeatureToggles for VisionConfig {
    fn should_use_vision_first_pipeline(&self) -> bool {
        self.enabled
    }

    fn vision_confidence_threshold(&self) -> f64 {
        f64::from(self.confidence_threshold)
    }
}
