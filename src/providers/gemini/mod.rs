use crate::core::error::ProviderError;
use crate::providers::{Provider, ProviderClient};
use async_trait::async_trait;

mod client;
mod types;

pub use client::GeminiClient;

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            client: GeminiClient::new(client, base_url, model),
        }
    }

    pub fn model(&self) -> &str {
        &self.client.model
    }
}

#[async_trait]
impl ProviderClient for GeminiProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn send(&self, prompt: &str, credential: &str) -> Result<String, ProviderError> {
        self.client.generate_content(prompt, credential).await
    }
}
