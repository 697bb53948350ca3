use crate::core::error::ProviderError;
use crate::providers::{Provider, ProviderClient};
use async_trait::async_trait;

/// Offline stand-in that answers with a fixed template and never fails.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedClient {
    provider: Provider,
}

impl SimulatedClient {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn reply_for(provider: Provider, prompt: &str) -> String {
        format!("[Simulated {} response to: '{}']", provider.label(), prompt)
    }
}

#[async_trait]
impl ProviderClient for SimulatedClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(&self, prompt: &str, _credential: &str) -> Result<String, ProviderError> {
        Ok(Self::reply_for(self.provider, prompt))
    }
}

/// Used for providers whose cargo feature is compiled out.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableClient {
    provider: Provider,
}

impl UnavailableClient {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ProviderClient for UnavailableClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(&self, _prompt: &str, _credential: &str) -> Result<String, ProviderError> {
        Err(ProviderError::ClientUnavailable)
    }
}
