use crate::providers::Provider;
use std::io;
use thiserror::Error;

/// Application-level error type for polychat
#[derive(Error, Debug)]
pub enum ChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unknown or unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<String> for ChatError {
    fn from(err: String) -> Self {
        ChatError::Unknown(err)
    }
}

impl From<&str> for ChatError {
    fn from(err: &str) -> Self {
        ChatError::Unknown(err.to_string())
    }
}

/// Failure of a single provider exchange.
///
/// These never abort the session: the controller turns them into the
/// assistant's reply via [`ProviderError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider integration is not compiled into this build
    #[error("client unavailable")]
    ClientUnavailable,

    /// Network, auth or validation failure reported by the provider
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The call succeeded but carried no text
    #[error("empty response")]
    EmptyResponse,
}

impl ProviderError {
    pub fn user_message(&self, provider: Provider) -> String {
        let label = provider.label();
        match self {
            ProviderError::ClientUnavailable => {
                format!("[{} client is not available in this build]", label)
            }
            ProviderError::RequestFailed(details) => format!("[{} API error: {}]", label, details),
            ProviderError::EmptyResponse => format!("[{} returned no response]", label),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::RequestFailed(format!("timeout: {}", err))
        } else if err.is_connect() {
            ProviderError::RequestFailed(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ProviderError::RequestFailed(format!("invalid response body: {}", err))
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::RequestFailed(format!("unexpected response format: {}", err))
    }
}

/// A session action whose precondition is unmet. The state is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTransition {
    #[error("no provider has been selected")]
    NoProvider,

    #[error("the credential is empty")]
    EmptyCredential,

    #[error("no credential has been set")]
    NoCredential,

    #[error("the settings panel is closed")]
    SettingsClosed,

    #[error("the settings panel is open")]
    SettingsOpen,

    #[error("the message is empty")]
    EmptyMessage,

    #[error("a response is still pending")]
    ResponsePending,
}
