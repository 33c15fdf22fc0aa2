//! OpenAI chat-completions client used for packaging analysis.
//!
//! The model reply is free text expected to hold one object with the
//! extracted product fields. It is run through the structured-output
//! extractor and wrapped in the collaborator contract shape
//! (`{success, data, ...}`). An unreadable reply is reported as
//! `success: false` rather than an error, matching the contract.

use std::time::Duration;

use async_trait::async_trait;
use prov_config::OpenAiConfig;
use prov_core::adapter::{ExtractedProductData, ImageAnalysisResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    CollaboratorError, ImageAnalyzer, ImagePayload, build_http_client, http::ensure_success,
};

const SERVICE: &str = "openai";

const SYSTEM_PROMPT: &str = r#"You are a product recognition expert. Analyze the product packaging and extract:

1. brand_name: the main brand or company name visible on the product
2. product_name: the specific product name or description
3. country_of_origin: any "made in" / "produced in" country printed on the pack
4. languages: ISO 639-1 codes of the languages printed on the pack
5. extracted_text: the most prominent text you can read (OCR)
6. confidence: 0-100, your confidence in the brand and product identification
7. quality_score: 0-100, how legible and complete the image is
8. needs_escalation: true if a human should review this image
9. reasoning: a brief explanation of how you identified the brand/product

Be conservative with confidence. Use null for anything you cannot read.
Return ONLY a JSON object with exactly these fields."#;

/// Values the model uses when it could not read a field.
const PLACEHOLDERS: [&str; 3] = ["unknown", "unknown brand", "unknown product"];

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn drop_placeholder(value: Option<String>) -> Option<String> {
    value.filter(|v| !PLACEHOLDERS.contains(&v.trim().to_lowercase().as_str()))
}

/// Map the model's reply text onto the collaborator contract.
fn to_analysis(content: &str) -> ImageAnalysisResponse {
    match prov_core::extract_record::<ExtractedProductData>(content) {
        Ok(mut data) => {
            data.brand_name = drop_placeholder(data.brand_name);
            data.product_name = drop_placeholder(data.product_name);
            ImageAnalysisResponse {
                success: true,
                confidence: data.confidence,
                data: Some(data),
                ..ImageAnalysisResponse::default()
            }
        }
        Err(error) => {
            tracing::warn!(%error, "openai: unreadable image analysis reply");
            ImageAnalysisResponse {
                success: false,
                error: Some(error.to_string()),
                reasoning: Some(content.chars().take(500).collect()),
                ..ImageAnalysisResponse::default()
            }
        }
    }
}

/// Image analyzer over OpenAI chat completions with image input.
pub struct OpenAiVisionClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiVisionClient {
    /// Build a client from its config section.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::NotConfigured`] without an API key.
    pub fn from_config(config: &OpenAiConfig, timeout: Duration) -> Result<Self, CollaboratorError> {
        if !config.is_configured() {
            return Err(CollaboratorError::NotConfigured(SERVICE));
        }
        Ok(Self {
            http: build_http_client(timeout),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageAnalyzer for OpenAiVisionClient {
    async fn analyze(
        &self,
        image: &ImagePayload,
    ) -> Result<ImageAnalysisResponse, CollaboratorError> {
        let body = json!({
            "model": self.model,
            "max_tokens": 500,
            "temperature": 0.1,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": [
                    {"type": "text", "text": "Analyze this product image and extract the fields as specified."},
                    {"type": "image_url", "image_url": {"url": image.data_uri(), "detail": "high"}}
                ]}
            ]
        });

        tracing::debug!(model = %self.model, format = %image.format, "openai: analysing image");
        let resp = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(SERVICE, resp).await?;

        let data: ChatResponse = resp.json().await?;
        let content = data
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(CollaboratorError::EmptyResponse(SERVICE))?;
        Ok(to_analysis(&content))
    }
}
