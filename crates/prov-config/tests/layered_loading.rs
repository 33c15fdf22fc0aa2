//! Integration tests for TOML + environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and file manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use prov_config::{FeatureToggles, ProvConfig};

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[vision]
enabled = false
confidence_threshold = 85

[anthropic]
api_key = "sk-ant-toml"
model = "claude-test"
assessment_max_tokens = 1500

[search]
api_key = "google-key"
engine_id = "cse-id"
results_per_query = 5

[pipeline]
stage_timeout_secs = 12
no_source_penalty = 40
"#,
        )?;

        let config: ProvConfig = Figment::from(Serialized::defaults(ProvConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.vision.should_use_vision_first_pipeline());
        assert_eq!(config.vision.confidence_threshold, 85);
        assert_eq!(config.anthropic.api_key, "sk-ant-toml");
        assert_eq!(config.anthropic.model, "claude-test");
        assert_eq!(config.anthropic.assessment_model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.anthropic.assessment_max_tokens, 1500);
        assert_eq!(config.anthropic.max_tokens, 512);
        assert!(config.search.is_configured());
        assert_eq!(config.search.results_per_query, 5);
        assert_eq!(config.pipeline.stage_timeout_secs, 12);
        assert_eq!(config.pipeline.no_source_penalty, 40);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".provenance")?;
        jail.create_file(
            ".provenance/config.toml",
            r#"
[anthropic]
api_key = "sk-ant-project"
"#,
        )?;

        let config = ProvConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.anthropic.api_key, "sk-ant-project");
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn env_overrides_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".provenance")?;
        jail.create_file(
            ".provenance/config.toml",
            r#"
[vision]
confidence_threshold = 60
"#,
        )?;
        jail.set_env("PROVENANCE_VISION__CONFIDENCE_THRESHOLD", "90");
        jail.set_env("PROVENANCE_VISION__ENABLED", "false");
        jail.set_env("PROVENANCE_PIPELINE__STAGE_TIMEOUT_SECS", "5");

        let config = ProvConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.vision.confidence_threshold, 90);
        assert!(!config.vision.enabled);
        assert_eq!(config.pipeline.stage_timeout_secs, 5);
        Ok(())
    });
}

#[test]
fn defaults_without_any_source() {
    Jail::expect_with(|_jail| {
        let config = ProvConfig::load().map_err(|e| e.to_string())?;
        assert!(config.vision.enabled);
        assert!((config.vision.vision_confidence_threshold() - 70.0).abs() < f64::EPSILON);
        assert_eq!(config.pipeline.no_source_penalty, 60);
        assert!(!config.anthropic.is_configured());
        Ok(())
    });
}
