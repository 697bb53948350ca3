use crate::core::error::ChatError;
use crate::providers::Provider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Endpoint overrides for one provider. Credentials are never read from disk.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub default_provider: Option<Provider>,
    #[serde(default)]
    pub simulate: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            simulate: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(".polychat").join("config.yaml")
    }

    /// Reads the config file without ever creating one.
    ///
    /// A missing default file yields defaults; a missing explicit path is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ChatError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ChatError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::default_path();
                if !path.exists() {
                    debug!(path = %path.display(), "no config file, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)?;
        let config = Self::from_yaml_str(&contents)
            .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Config, ChatError> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yml::from_str::<Config>(contents)?)
    }

    pub fn provider(&self, provider: Provider) -> ProviderConfig {
        self.providers.get(&provider).cloned().unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn parses_provider_overrides() {
        let yaml = r#"
default_provider: groq
request_timeout_secs: 15
providers:
  openai:
    base_url: http://localhost:8080/v1
  groq:
    model: llama-3.1-8b-instant
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.default_provider, Some(Provider::Groq));
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(
            config.provider(Provider::OpenAI).base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
        assert_eq!(
            config.provider(Provider::Groq).model.as_deref(),
            Some("llama-3.1-8b-instant")
        );
        assert_eq!(config.provider(Provider::Claude), ProviderConfig::default());
    }

    #[test]
    fn rejects_stored_api_keys() {
        let yaml = "providers:\n  openai:\n    api_key: sk-secret\n";
        assert!(Config::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulate: true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.simulate);
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(!missing.exists());
    }

    #[test]
    fn load_reports_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_provider: [not, a, provider]").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
