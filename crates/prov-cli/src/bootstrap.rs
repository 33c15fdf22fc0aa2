use std::sync::Arc;

use anyhow::Context;
use prov_config::ProvConfig;
use prov_llm::{
    AnthropicClient, GenerativeBackend, GoogleSearchClient, ImageAnalyzer, OpenAiVisionClient,
    WebSearch,
};
use prov_pipeline::{
    EvidenceAssessor, EvidenceVerifier, HypothesisGenerator, OwnershipPipeline,
    VisionContextBuilder,
};

/// Load layered configuration, including a `.env` in the working directory.
pub fn load_config() -> anyhow::Result<ProvConfig> {
    ProvConfig::load_with_dotenv().context("failed to load provenance configuration")
}

/// Build every collaborator once and wire them into the pipeline.
///
/// The generative backend is required. Image analysis and web search are
/// optional; without them vision lookups escalate and assessments run with
/// no snippets.
pub fn build_pipeline(config: &ProvConfig) -> anyhow::Result<OwnershipPipeline> {
    config.validate().context("configuration is incomplete")?;
    let timeout = config.pipeline.stage_timeout();

    let backend: Arc<dyn GenerativeBackend> = Arc::new(
        AnthropicClient::from_config(&config.anthropic, timeout)
            .context("failed to create generative backend client")?,
    );

    let analyzer: Option<Arc<dyn ImageAnalyzer>> =
        match OpenAiVisionClient::from_config(&config.openai, timeout) {
            Ok(client) => Some(Arc::new(client)),
            Err(error) => {
                tracing::debug!(%error, "image analysis unavailable");
                None
            }
        };

    let search: Option<Arc<dyn WebSearch>> =
        match GoogleSearchClient::from_config(&config.search, timeout) {
            Ok(client) => Some(Arc::new(client)),
            Err(error) => {
                tracing::debug!(%error, "web search unavailable");
                None
            }
        };

    let anthropic = &config.anthropic;
    Ok(OwnershipPipeline::new(
        VisionContextBuilder::new(analyzer, Arc::new(config.vision.clone()), timeout),
        HypothesisGenerator::new(
            Arc::clone(&backend),
            anthropic.model.clone(),
            anthropic.max_tokens,
            timeout,
        ),
        EvidenceVerifier::new(
            Arc::clone(&backend),
            anthropic.model.clone(),
            anthropic.max_tokens,
            timeout,
            config.pipeline.no_source_penalty,
        ),
        EvidenceAssessor::new(
            backend,
            search,
            anthropic.assessment_model.clone(),
            anthropic.assessment_max_tokens,
            timeout,
        ),
    ))
}
