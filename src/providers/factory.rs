use crate::config::{Config, ProviderConfig};
use crate::core::error::ChatError;
#[cfg(feature = "claude")]
use crate::providers::anthropic::AnthropicClient;
#[cfg(feature = "gemini")]
use crate::providers::gemini::GeminiProvider;
#[cfg(any(feature = "openai", feature = "groq"))]
use crate::providers::openai_compatible::OpenAICompatibleClient;
use crate::providers::{Provider, ProviderClient, SimulatedClient, UnavailableClient};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps each provider to the client that serves it.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Real clients for every provider compiled into this build.
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut registry = Self::new();
        for provider in Provider::ALL {
            let client = create_client(provider, &config.provider(provider), &http);
            registry.register(provider, client);
        }
        Ok(registry)
    }

    /// Offline registry answering every provider with [`SimulatedClient`].
    pub fn simulated() -> Self {
        let mut registry = Self::new();
        for provider in Provider::ALL {
            registry.register(provider, Arc::new(SimulatedClient::new(provider)));
        }
        registry
    }

    pub fn register(&mut self, provider: Provider, client: Arc<dyn ProviderClient>) {
        self.clients.insert(provider, client);
    }

    pub fn client(&self, provider: Provider) -> Arc<dyn ProviderClient> {
        match self.clients.get(&provider) {
            Some(client) => Arc::clone(client),
            None => {
                debug!(provider = provider.id(), "no client registered, simulating");
                Arc::new(SimulatedClient::new(provider))
            }
        }
    }
}

#[allow(unused_variables)]
fn create_client(
    provider: Provider,
    config: &ProviderConfig,
    http: &reqwest::Client,
) -> Arc<dyn ProviderClient> {
    let info = provider.info();
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| info.default_model.to_string());
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| info.default_base_url.to_string());

    match provider {
        #[cfg(feature = "claude")]
        Provider::Claude => Arc::new(AnthropicClient::new(http.clone(), base_url, model)),
        #[cfg(feature = "openai")]
        Provider::OpenAI => Arc::new(OpenAICompatibleClient::new(
            Provider::OpenAI,
            http.clone(),
            base_url,
            model,
        )),
        #[cfg(feature = "gemini")]
        Provider::Gemini => Arc::new(GeminiProvider::new(http.clone(), base_url, model)),
        #[cfg(feature = "groq")]
        Provider::Groq => Arc::new(OpenAICompatibleClient::new(
            Provider::Groq,
            http.clone(),
            base_url,
            model,
        )),
        #[allow(unreachable_patterns)]
        other => Arc::new(UnavailableClient::new(other)),
    }
}
