//! Image-analysis backend (OpenAI chat completions with vision) configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    String::from("gpt-4o")
}

fn default_base_url() -> String {
    String::from("https://api.openai.com")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
