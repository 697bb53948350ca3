use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::non_empty;

/// Thin wrapper over the `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            client: HttpClient::new(client, base_url, None),
            model,
        }
    }

    pub async fn generate_content(
        &self,
        prompt: &str,
        api_key: &str,
    ) -> Result<String, ProviderError> {
        let payload = build_payload(prompt);
        // Header auth keeps the key out of request URLs.
        let response: GeminiResponse = self
            .client
            .post_json(
                &format!("v1beta/models/{}:generateContent", self.model),
                ("x-goog-api-key", api_key.to_string()),
                &payload,
            )
            .await?;

        extract_answer(response)
    }
}

pub(crate) fn build_payload(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContentPart {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
    }
}

pub(crate) fn extract_answer(response: GeminiResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();

    non_empty(text)
}
