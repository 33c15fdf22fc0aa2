//! Google Custom Search client for the evidence-assessment research pass.

use std::time::Duration;

use async_trait::async_trait;
use prov_config::SearchConfig;
use serde::Deserialize;

use crate::{
    CollaboratorError, SearchSnippet, WebSearch, build_http_client, http::ensure_success,
};

const SERVICE: &str = "google-search";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    display_link: String,
    #[serde(default)]
    link: String,
}

impl From<SearchItem> for SearchSnippet {
    fn from(item: SearchItem) -> Self {
        Self {
            title: item.title,
            content: item.snippet,
            source: item.display_link,
            url: item.link,
        }
    }
}

pub struct GoogleSearchClient {
    http: reqwest::Client,
    api_key: String,
    engine_id: String,
    results_per_query: u8,
}

impl GoogleSearchClient {
    /// Build a client from its config section.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::NotConfigured`] without a key and engine id.
    pub fn from_config(config: &SearchConfig, timeout: Duration) -> Result<Self, CollaboratorError> {
        if !config.is_configured() {
            return Err(CollaboratorError::NotConfigured(SERVICE));
        }
        Ok(Self {
            http: build_http_client(timeout),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            results_per_query: config.results_per_query.clamp(1, 10),
        })
    }
}

#[async_trait]
impl WebSearch for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, CollaboratorError> {
        let url = format!(
            "https://www.googleapis.com/customsearch/v1?key={}&cx={}&q={}&num={}",
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.engine_id),
            urlencoding::encode(query),
            self.results_per_query,
        );
        let resp = ensure_success(SERVICE, self.http.get(&url).send().await?).await?;
        let data: SearchResponse = resp.json().await?;
        tracing::debug!(query, hits = data.items.len(), "google-search: query complete");
        Ok(data.items.into_iter().map(SearchSnippet::from).collect())
    }
}
