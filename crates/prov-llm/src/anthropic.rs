//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use prov_config::AnthropicConfig;
use serde::{Deserialize, Serialize};

use crate::{
    CollaboratorError, CompletionRequest, GenerativeBackend, build_http_client,
    http::ensure_success,
};

const SERVICE: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// First text block of a Messages API reply.
fn first_text(response: MessagesResponse) -> Option<String> {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .find_map(|block| block.text)
        .filter(|text| !text.trim().is_empty())
}

/// Generative backend over the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Build a client from its config section.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::NotConfigured`] without an API key.
    pub fn from_config(
        config: &AnthropicConfig,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        if !config.is_configured() {
            return Err(CollaboratorError::NotConfigured(SERVICE));
        }
        Ok(Self {
            http: build_http_client(timeout),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CollaboratorError> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        tracing::debug!(model = %request.model, "anthropic: sending completion request");
        let resp = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(SERVICE, resp).await?;

        let data: MessagesResponse = resp.json().await?;
        first_text(data).ok_or(CollaboratorError::EmptyResponse(SERVICE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [
            {"type": "text", "text": "{\"financial_beneficiary\": \"Mondelez International\"}"}
        ],
        "stop_reason": "end_turn"
    }"#;

    #[test]
    fn parses_first_text_block() {
        let data: MessagesResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(
            first_text(data).as_deref(),
            Some("{\"financial_beneficiary\": \"Mondelez International\"}")
        );
    }

    #[test]
    fn empty_content_has_no_text() {
        let data: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(first_text(data).is_none());
        let data: MessagesResponse =
            serde_json::from_str(r#"{"content": [{"type": "text", "text": "  "}]}"#).unwrap();
        assert!(first_text(data).is_none());
    }

    #[test]
    fn request_body_shape() {
        let body = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 512,
            messages: [Message {
                role: "user",
                content: "Product: Oreo",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 512);
    }

    #[test]
    fn unconfigured_client_is_rejected() {
        let result = AnthropicClient::from_config(&AnthropicConfig::default(), Duration::from_secs(5));
        assert!(matches!(result, Err(CollaboratorError::NotConfigured("anthropic"))));
    }

    #[tokio::test]
    #[ignore] // requires network and PROVENANCE_ANTHROPIC__API_KEY
    async fn live_completion() {
        let config = AnthropicConfig {
            api_key: std::env::var("PROVENANCE_ANTHROPIC__API_KEY").unwrap_or_default(),
            ..AnthropicConfig::default()
        };
        let client = AnthropicClient::from_config(&config, Duration::from_secs(30)).unwrap();
        let text = client
            .complete(&CompletionRequest {
                model: config.model.clone(),
                prompt: "Reply with {\"ok\": true}".into(),
                max_tokens: 32,
            })
            .await
            .unwrap();
        println!("{text}");
    }
}
