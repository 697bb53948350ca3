use crate::providers::Provider;
use std::borrow::Cow;
use std::fmt;

/// Suffix shared by every pending placeholder's rendered text
pub const THINKING_SUFFIX: &str = "is thinking...";

pub fn placeholder_text(provider: Provider) -> String {
    format!("{} {}", provider.label(), THINKING_SUFFIX)
}

/// Secret for the selected provider. Held in memory only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Stand-in for an answer that has not been fetched yet
    Pending { provider: Provider },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn placeholder(provider: Provider) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Pending { provider },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.content, MessageContent::Pending { .. })
    }

    /// Display text; placeholders render as `"<Provider> is thinking..."`.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.content {
            MessageContent::Pending { provider } => Cow::Owned(placeholder_text(*provider)),
            MessageContent::Text(text) => Cow::Borrowed(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    NeedsProvider,
    NeedsCredential,
    Chatting,
    SettingsOpen,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionMode::NeedsProvider => "needs-provider",
            SessionMode::NeedsCredential => "needs-credential",
            SessionMode::Chatting => "chatting",
            SessionMode::SettingsOpen => "settings-open",
        };
        f.write_str(name)
    }
}

/// Mutable state of one interactive session.
///
/// Only [`ChatSessionController`](super::ChatSessionController) mutates it;
/// everyone else gets a shared reference.
#[derive(Debug, Default)]
pub struct SessionState {
    pub(super) provider: Option<Provider>,
    pub(super) credential: Credential,
    pub(super) transcript: Vec<Message>,
    pub(super) settings_visible: bool,
    pub(super) credential_just_set: bool,
    /// Bumped whenever an in-flight answer would no longer belong here
    pub(super) generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SessionMode {
        if self.provider.is_none() {
            SessionMode::NeedsProvider
        } else if self.credential.is_empty() {
            SessionMode::NeedsCredential
        } else if self.settings_visible {
            SessionMode::SettingsOpen
        } else {
            SessionMode::Chatting
        }
    }

    pub fn provider(&self) -> Option<Provider> {
        self.provider
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn settings_visible(&self) -> bool {
        self.settings_visible
    }

    pub fn credential_just_set(&self) -> bool {
        self.credential_just_set
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the transcript ends with an unresolved placeholder.
    pub fn is_awaiting_response(&self) -> bool {
        self.transcript.last().is_some_and(Message::is_pending)
    }

    pub(super) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
