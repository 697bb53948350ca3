use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Provider, ProviderClient, non_empty};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Clone)]
pub struct AnthropicClient {
    client: HttpClient,
    model: String,
}

impl AnthropicClient {
    /// Wraps a shared reqwest client with the Anthropic base URL and version header.
    pub fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        let mut extra_headers = HashMap::new();
        extra_headers.insert(
            "anthropic-version".to_string(),
            ANTHROPIC_VERSION.to_string(),
        );
        Self {
            client: HttpClient::new(client, base_url, Some(extra_headers)),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model,
        max_tokens: MAX_TOKENS,
        messages: vec![AnthropicMessage {
            role: "user",
            content: prompt,
        }],
    }
}

fn extract_answer(response: AnthropicResponse) -> Result<String, ProviderError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    non_empty(text)
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    async fn send(&self, prompt: &str, credential: &str) -> Result<String, ProviderError> {
        let payload = build_request(&self.model, prompt);
        let response: AnthropicResponse = self
            .client
            .post_json("messages", ("x-api-key", credential.to_string()), &payload)
            .await?;

        extract_answer(response)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}
