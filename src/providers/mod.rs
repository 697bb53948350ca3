use crate::core::error::ProviderError;
use async_trait::async_trait;

/// One outbound completion call to a hosted chat provider.
///
/// `prompt` is only the most recent user message; no history is sent.
/// Implementations never touch session state.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn send(&self, prompt: &str, credential: &str) -> Result<String, ProviderError>;
}

/// Rejects answers that carry no visible text
pub(crate) fn non_empty(text: String) -> Result<String, ProviderError> {
    if text.trim().is_empty() {
        Err(ProviderError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[cfg(feature = "claude")]
pub mod anthropic;
#[cfg(any(feature = "claude", feature = "openai", feature = "gemini", feature = "groq"))]
pub mod base_client;
pub mod factory;
#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(any(feature = "openai", feature = "groq"))]
pub mod openai_compatible;
pub mod registry;
pub mod simulated;

pub use factory::ClientRegistry;
pub use registry::{ParseProviderError, Provider, ProviderInfo};
pub use simulated::{SimulatedClient, UnavailableClient};
