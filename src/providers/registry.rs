use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    OpenAI,
    Gemini,
    Groq,
}

/// Static presentation and wiring metadata for one provider
#[derive(Debug)]
pub struct ProviderInfo {
    pub label: &'static str,
    pub icon: &'static str,
    pub default_model: &'static str,
    pub default_base_url: &'static str,
}

static CLAUDE: ProviderInfo = ProviderInfo {
    label: "Claude",
    icon: "🟠",
    default_model: "claude-3-opus-20240229",
    default_base_url: "https://api.anthropic.com/v1",
};

static OPENAI: ProviderInfo = ProviderInfo {
    label: "OpenAI",
    icon: "🟢",
    default_model: "gpt-3.5-turbo",
    default_base_url: "https://api.openai.com/v1",
};

static GEMINI: ProviderInfo = ProviderInfo {
    label: "Gemini",
    icon: "🔷",
    default_model: "gemini-2.5-flash",
    default_base_url: "https://generativelanguage.googleapis.com",
};

static GROQ: ProviderInfo = ProviderInfo {
    label: "Groq",
    icon: "⚡",
    default_model: "llama3-70b-8192",
    default_base_url: "https://api.groq.com/openai/v1",
};

impl Provider {
    /// Selection order shown to the user
    pub const ALL: [Provider; 4] = [
        Provider::Claude,
        Provider::OpenAI,
        Provider::Gemini,
        Provider::Groq,
    ];

    pub fn info(&self) -> &'static ProviderInfo {
        match self {
            Provider::Claude => &CLAUDE,
            Provider::OpenAI => &OPENAI,
            Provider::Gemini => &GEMINI,
            Provider::Groq => &GROQ,
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn icon(&self) -> &'static str {
        self.info().icon
    }

    /// Lowercase identifier used in config files and commands
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::OpenAI => "openai",
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown provider '{0}' (expected one of: claude, openai, gemini, groq)")]
pub struct ParseProviderError(pub String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    /// Accepts identifiers, a few aliases, and 1-based menu positions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(position) = trimmed.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| Provider::ALL.get(index).copied())
                .ok_or_else(|| ParseProviderError(trimmed.to_string()));
        }

        match trimmed.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Provider::Claude),
            "openai" | "gpt" => Ok(Provider::OpenAI),
            "gemini" | "google" => Ok(Provider::Gemini),
            "groq" | "grok" => Ok(Provider::Groq),
            _ => Err(ParseProviderError(trimmed.to_string())),
        }
    }
}
