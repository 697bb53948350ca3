use crate::core::error::{InvalidTransition, ProviderError};
use crate::providers::{ClientRegistry, Provider, ProviderClient};
use crate::session::state::{Credential, Message, MessageContent, Role, SessionMode, SessionState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a phase-two pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was pending
    Idle,
    /// The placeholder was replaced in place
    Resolved,
    /// The session moved on while the request was in flight
    Discarded,
}

/// Everything phase two needs, detached from the controller so the network
/// call can run without holding a borrow of the session.
pub struct PendingRequest {
    provider: Provider,
    prompt: String,
    credential: Credential,
    generation: u64,
    index: usize,
    client: Arc<dyn ProviderClient>,
}

impl PendingRequest {
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub async fn execute(&self) -> Result<String, ProviderError> {
        self.client
            .send(&self.prompt, self.credential.expose())
            .await
    }
}

/// Drives one session through provider selection, credential entry and the
/// two-pass message exchange.
pub struct ChatSessionController {
    state: SessionState,
    clients: Arc<ClientRegistry>,
}

impl ChatSessionController {
    pub fn new(clients: Arc<ClientRegistry>) -> Self {
        Self {
            state: SessionState::new(),
            clients,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode()
    }

    /// Switching to a different provider resets the session; re-selecting
    /// the current one is a no-op. Returns whether anything changed.
    pub fn select_provider(&mut self, provider: Provider) -> bool {
        if self.state.provider == Some(provider) {
            debug!(provider = provider.id(), "provider already selected");
            return false;
        }

        info!(provider = provider.id(), "provider selected");
        self.state.provider = Some(provider);
        self.state.credential = Credential::default();
        self.state.transcript.clear();
        self.state.settings_visible = false;
        self.state.credential_just_set = false;
        self.state.bump_generation();
        true
    }

    pub fn submit_credential(&mut self, secret: &str) -> Result<(), InvalidTransition> {
        if secret.is_empty() {
            return Err(self.reject("submit credential", InvalidTransition::EmptyCredential));
        }
        match self.state.mode() {
            SessionMode::NeedsProvider => {
                return Err(self.reject("submit credential", InvalidTransition::NoProvider));
            }
            SessionMode::Chatting => {
                return Err(self.reject("submit credential", InvalidTransition::SettingsClosed));
            }
            SessionMode::NeedsCredential | SessionMode::SettingsOpen => {}
        }

        debug!(length = secret.len(), "credential set");
        self.state.credential = Credential::new(secret);
        self.state.credential_just_set = true;
        self.state.settings_visible = false;
        self.state.bump_generation();
        Ok(())
    }

    pub fn toggle_settings(&mut self) -> Result<(), InvalidTransition> {
        match self.state.mode() {
            SessionMode::NeedsProvider => {
                Err(self.reject("toggle settings", InvalidTransition::NoProvider))
            }
            SessionMode::NeedsCredential => {
                Err(self.reject("toggle settings", InvalidTransition::NoCredential))
            }
            SessionMode::Chatting | SessionMode::SettingsOpen => {
                self.state.settings_visible = !self.state.settings_visible;
                debug!(visible = self.state.settings_visible, "settings toggled");
                Ok(())
            }
        }
    }

    pub fn clear_chat(&mut self) -> Result<(), InvalidTransition> {
        match self.state.mode() {
            SessionMode::NeedsProvider => {
                Err(self.reject("clear chat", InvalidTransition::NoProvider))
            }
            SessionMode::NeedsCredential => {
                Err(self.reject("clear chat", InvalidTransition::NoCredential))
            }
            SessionMode::Chatting | SessionMode::SettingsOpen => {
                debug!(entries = self.state.transcript.len(), "transcript cleared");
                self.state.transcript.clear();
                self.state.bump_generation();
                Ok(())
            }
        }
    }

    /// Consumes the one-shot "credential just set" notice.
    pub fn take_credential_notice(&mut self) -> bool {
        std::mem::take(&mut self.state.credential_just_set)
    }

    /// Phase one: record the user's message and a placeholder reply.
    pub fn submit_message(&mut self, text: &str) -> Result<(), InvalidTransition> {
        let provider = match self.state.mode() {
            SessionMode::NeedsProvider => {
                return Err(self.reject("send message", InvalidTransition::NoProvider));
            }
            SessionMode::NeedsCredential => {
                return Err(self.reject("send message", InvalidTransition::NoCredential));
            }
            SessionMode::SettingsOpen => {
                return Err(self.reject("send message", InvalidTransition::SettingsOpen));
            }
            SessionMode::Chatting => self.state.provider.ok_or(InvalidTransition::NoProvider)?,
        };
        if text.trim().is_empty() {
            return Err(self.reject("send message", InvalidTransition::EmptyMessage));
        }
        if self.state.is_awaiting_response() {
            return Err(self.reject("send message", InvalidTransition::ResponsePending));
        }

        debug!(length = text.len(), "message submitted");
        self.state.transcript.push(Message::user(text));
        self.state.transcript.push(Message::placeholder(provider));
        Ok(())
    }

    /// Captures the call phase two has to make, if a placeholder is pending.
    pub fn begin_resolution(&self) -> Option<PendingRequest> {
        let index = self.state.transcript.len().checked_sub(1)?;
        let provider = match &self.state.transcript[index].content {
            MessageContent::Pending { provider } => *provider,
            MessageContent::Text(_) => return None,
        };
        if self.state.provider != Some(provider) || self.state.credential.is_empty() {
            warn!(provider = provider.id(), "placeholder no longer matches session");
            return None;
        }

        let prompt = self.state.transcript[..index]
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.text().into_owned())?;

        Some(PendingRequest {
            provider,
            prompt,
            credential: self.state.credential.clone(),
            generation: self.state.generation,
            index,
            client: self.clients.client(provider),
        })
    }

    /// Writes a finished call back into the transcript, unless the session
    /// changed underneath it.
    pub fn complete_resolution(
        &mut self,
        request: PendingRequest,
        outcome: Result<String, ProviderError>,
    ) -> Resolution {
        let still_pending = self
            .state
            .transcript
            .get(request.index)
            .is_some_and(Message::is_pending);
        if request.generation != self.state.generation
            || self.state.provider != Some(request.provider)
            || !still_pending
        {
            warn!(
                provider = request.provider.id(),
                "discarding stale resolution"
            );
            return Resolution::Discarded;
        }

        let text = match outcome {
            Ok(answer) => {
                info!(
                    provider = request.provider.id(),
                    length = answer.len(),
                    "response received"
                );
                answer
            }
            Err(err) => {
                warn!(provider = request.provider.id(), error = %err, "exchange failed");
                err.user_message(request.provider)
            }
        };

        self.state.transcript[request.index] = Message::assistant(text);
        Resolution::Resolved
    }

    /// Phase two: fetch the pending answer and replace the placeholder.
    pub async fn resolve_pending(&mut self) -> Resolution {
        let Some(request) = self.begin_resolution() else {
            return Resolution::Idle;
        };
        let outcome = request.execute().await;
        self.complete_resolution(request, outcome)
    }

    fn reject(&self, action: &str, reason: InvalidTransition) -> InvalidTransition {
        debug!(action, mode = %self.state.mode(), %reason, "ignored invalid transition");
        reason
    }
}
