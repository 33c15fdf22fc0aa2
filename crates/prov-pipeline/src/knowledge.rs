//! Ownership Hypothesis Generator ("knowledge" stage).

use std::sync::Arc;
use std::time::Duration;

use prov_core::de;
use prov_core::entities::OwnershipHypothesis;
use prov_llm::{CompletionRequest, GenerativeBackend};
use serde::Deserialize;

use crate::{StageError, bounded, prompts};

/// Subject of one hypothesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectQuery {
    pub product: String,
    pub brand: String,
    /// `image_analysis`, `manual_input`, or `merged`.
    pub data_source: Option<&'static str>,
    pub region_hint: Option<String>,
}

#[derive(Deserialize)]
struct HypothesisReply {
    #[serde(default, deserialize_with = "de::opt_text")]
    financial_beneficiary: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    beneficiary_country: Option<String>,
    #[serde(default, deserialize_with = "de::score")]
    confidence_score: u8,
    #[serde(default, deserialize_with = "de::opt_text")]
    ownership_structure_type: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    reasoning: String,
}

impl From<HypothesisReply> for OwnershipHypothesis {
    fn from(reply: HypothesisReply) -> Self {
        Self {
            financial_beneficiary: reply.financial_beneficiary,
            beneficiary_country: reply.beneficiary_country,
            confidence_score: reply.confidence_score,
            ownership_structure_type: reply.ownership_structure_type,
            reasoning: reply.reasoning,
        }
    }
}

pub struct HypothesisGenerator {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl HypothesisGenerator {
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            max_tokens,
            timeout,
        }
    }

    /// Produce a hypothesis; any failure yields a zero-confidence record
    /// whose reasoning carries the error.
    pub async fn generate(&self, query: &SubjectQuery) -> OwnershipHypothesis {
        tracing::debug!(product = %query.product, brand = %query.brand, "knowledge: generating hypothesis");
        match self.try_generate(query).await {
            Ok(hypothesis) => hypothesis,
            Err(error) => {
                tracing::warn!(%error, "knowledge: stage degraded");
                OwnershipHypothesis::degraded(format!("Error: {error}"))
            }
        }
    }

    async fn try_generate(&self, query: &SubjectQuery) -> Result<OwnershipHypothesis, StageError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::hypothesis(query),
            max_tokens: self.max_tokens,
        };
        let text = bounded("knowledge", self.timeout, self.backend.complete(&request)).await?;
        let reply: HypothesisReply = prov_core::extract_record(&text)?;
        Ok(reply.into())
    }
}
