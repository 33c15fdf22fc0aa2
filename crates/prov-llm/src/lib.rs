//! # prov-llm
//!
//! External collaborators for provenance, behind traits so pipeline stages
//! can be driven by substitutes in tests:
//! - [`GenerativeBackend`]: free-text completion (Anthropic Messages API)
//! - [`ImageAnalyzer`]: packaging analysis (OpenAI chat completions with vision)
//! - [`WebSearch`]: open-web research snippets (Google Custom Search)
//!
//! Clients are built once at start-up from `prov-config` sections and shared
//! behind `Arc`. None of them retries; a failed call is a
//! [`CollaboratorError`] for the calling stage to absorb.

pub mod anthropic;
pub mod google;
pub mod openai;

mod error;
mod http;

pub use anthropic::AnthropicClient;
pub use error::CollaboratorError;
pub use google::GoogleSearchClient;
pub use openai::OpenAiVisionClient;

use async_trait::async_trait;
use prov_core::adapter::ImageAnalysisResponse;
use serde::{Deserialize, Serialize};

// ── Types ──────────────────────────────────────────────────────────

/// One prompt sent to a generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// An encoded image and its format tag (`jpeg`, `png`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub base64: String,
    pub format: String,
}

impl ImagePayload {
    /// `data:` URI for APIs that take inline images.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:image/{};base64,{}", self.format, self.base64)
    }
}

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    pub content: String,
    /// Display host, e.g. `www.mondelezinternational.com`.
    pub source: String,
    pub url: String,
}

// ── Collaborator traits ────────────────────────────────────────────

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Return the raw text of the model's reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &ImagePayload)
    -> Result<ImageAnalysisResponse, CollaboratorError>;
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, CollaboratorError>;
}

/// Build a shared `reqwest` client with a user agent and request timeout.
///
/// # Panics
///
/// Panics if the underlying `reqwest::Client` fails to build.
#[must_use]
pub(crate) fn build_http_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("provenance/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .expect("reqwest client should build")
}
