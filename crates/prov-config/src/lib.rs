//! # prov-config
//!
//! Layered configuration loading for provenance using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PROVENANCE_*` prefix, `__` as separator)
//! 2. Project-level `.provenance/config.toml`
//! 3. User-level `~/.config/provenance/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PROVENANCE_ANTHROPIC__API_KEY` -> `anthropic.api_key`,
//! `PROVENANCE_VISION__CONFIDENCE_THRESHOLD` -> `vision.confidence_threshold`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use prov_config::ProvConfig;
//!
//! let config = ProvConfig::load_with_dotenv().expect("config");
//! config.validate().expect("generative backend configured");
//! ```

mod anthropic;
mod error;
mod openai;
mod pipeline;
mod search;
mod vision;

pub use anthropic::AnthropicConfig;
pub use error::ConfigError;
pub use openai::OpenAiConfig;
pub use pipeline::PipelineConfig;
pub use search::SearchConfig;
pub use vision::VisionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pure configuration reads that steer the vision-first pipeline.
pub trait FeatureToggles: Send + Sync {
    fn should_use_vision_first_pipeline(&self) -> bool;

    /// Threshold on the 0–100 vision confidence scale.
    fn vision_confidence_threshold(&self) -> f64;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvConfig {
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl ProvConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".provenance/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PROVENANCE_").split("__"))
    }

    /// Check the values a lookup cannot run without.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotConfigured`] when the generative backend has no key.
    /// - [`ConfigError::InvalidValue`] for a threshold above 100 or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.anthropic.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: String::from("anthropic"),
            });
        }
        if self.vision.confidence_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                field: String::from("vision.confidence_threshold"),
                reason: format!("{} is above 100", self.vision.confidence_threshold),
            });
        }
        if self.pipeline.stage_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("pipeline.stage_timeout_secs"),
                reason: String::from("must be greater than zero"),
            });
        }
        if self.pipeline.no_source_penalty > 100 {
            return Err(ConfigError::InvalidValue {
                field: String::from("pipeline.no_source_penalty"),
                reason: format!("{} is above 100", self.pipeline.no_source_penalty),
            });
        }
        Ok(())
    }

    /// A copy with every secret replaced, safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |secret: &str| {
            if secret.is_empty() {
                String::new()
            } else {
                String::from("<redacted>")
            }
        };
        let mut copy = self.clone();
        copy.anthropic.api_key = mask(&self.anthropic.api_key);
        copy.openai.api_key = mask(&self.openai.api_key);
        copy.search.api_key = mask(&self.search.api_key);
        copy
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("provenance").join("config.toml"))
    }
}
