//! Generative backend (Anthropic Messages API) configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    String::from("claude-3-haiku-20240307")
}

fn default_assessment_model() -> String {
    String::from("claude-3-5-sonnet-20241022")
}

fn default_base_url() -> String {
    String::from("https://api.anthropic.com")
}

const fn default_max_tokens() -> u32 {
    512
}

const fn default_assessment_max_tokens() -> u32 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`.
    #[serde(default)]
    pub api_key: String,

    /// Model for the hypothesis and verifier stages.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model for the evidence-assessment stage.
    #[serde(default = "default_assessment_model")]
    pub assessment_model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Reply budget for the evidence-assessment stage.
    #[serde(default = "default_assessment_max_tokens")]
    pub assessment_max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            assessment_model: default_assessment_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            assessment_max_tokens: default_assessment_max_tokens(),
        }
    }
}

impl AnthropicConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
