//! Pipeline-wide limits and policy values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_stage_timeout_secs() -> u64 {
    30
}

const fn default_no_source_penalty() -> u8 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Upper bound on each collaborator call.
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,

    /// Confidence removed when a claim is contradicted and no source exists.
    #[serde(default = "default_no_source_penalty")]
    pub no_source_penalty: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout_secs(),
            no_source_penalty: default_no_source_penalty(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub const fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}
