//! Web search (Google Custom Search) configuration.

use serde::{Deserialize, Serialize};

const fn default_results_per_query() -> u8 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: String,

    /// Custom Search Engine id (`cx`).
    #[serde(default)]
    pub engine_id: String,

    #[serde(default = "default_results_per_query")]
    pub results_per_query: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            results_per_query: default_results_per_query(),
        }
    }
}

impl SearchConfig {
    /// Both the key and the engine id are required.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.engine_id.trim().is_empty()
    }
}
