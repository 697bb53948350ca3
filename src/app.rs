use crate::commands::{ChatState, CommandDispatcher};
use crate::core::error::ChatError;
use crate::display;
use crate::input::{self, ChatEditor};
use crate::providers::Provider;
use crate::session::{ChatSessionController, Resolution, SessionMode};
use tracing::{debug, warn};

/// Message shown once under the next rendered view
enum Flash {
    Info(String),
    Error(String),
}

/// Terminal front-end for a single chat session.
pub struct Application {
    state: ChatState,
    command_dispatcher: CommandDispatcher,
    editor: ChatEditor,
    flash: Option<Flash>,
}

impl Application {
    pub fn new(
        controller: ChatSessionController,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, ChatError> {
        let editor = input::create_editor(command_dispatcher.clone())?;
        Ok(Self {
            state: ChatState::new(controller),
            command_dispatcher,
            editor,
            flash: None,
        })
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        self.render();

        while self.state.should_continue {
            // The placeholder is already on screen; fetch the real answer now.
            if self.state.controller.state().is_awaiting_response() {
                match self.state.controller.resolve_pending().await {
                    Resolution::Idle => warn!("pending placeholder could not be resolved"),
                    outcome => {
                        debug!(?outcome, "phase two finished");
                        self.render();
                        continue;
                    }
                }
            }

            let keep_going = match self.state.controller.mode() {
                SessionMode::NeedsProvider => self.handle_provider_choice()?,
                SessionMode::NeedsCredential => self.handle_credential_entry()?,
                SessionMode::SettingsOpen => self.handle_settings()?,
                SessionMode::Chatting => self.handle_chat_input()?,
            };
            if !keep_going {
                break;
            }

            self.render();
        }

        Ok(())
    }

    fn render(&mut self) {
        let notice = self.state.controller.take_credential_notice();
        display::render(self.state.controller.state(), notice);

        match self.flash.take() {
            Some(Flash::Info(message)) => display::display_output(&message),
            Some(Flash::Error(message)) => display::display_error(&message),
            None => {}
        }
    }

    fn handle_provider_choice(&mut self) -> Result<bool, ChatError> {
        let Some(line) = input::read_input(&mut self.editor, "Provider [1-4 or name]:")? else {
            return Ok(false);
        };
        if self.try_command(&line) {
            return Ok(true);
        }
        if !line.trim().is_empty() {
            self.apply_provider_choice(&line);
        }
        Ok(true)
    }

    fn handle_credential_entry(&mut self) -> Result<bool, ChatError> {
        let label = self.current_label();
        let Some(secret) = input::read_secret(&format!("{} API Key:", label))? else {
            return Ok(false);
        };
        if self.try_command(&secret) {
            return Ok(true);
        }
        if let Err(reason) = self.state.controller.submit_credential(&secret) {
            debug!(%reason, "credential entry ignored");
        }
        Ok(true)
    }

    /// Provider first, then an optional new key; Enter on both closes the panel.
    fn handle_settings(&mut self) -> Result<bool, ChatError> {
        let label = self.current_label();
        let prompt = format!("Provider [Enter keeps {}]:", label);
        let Some(line) = input::read_input(&mut self.editor, &prompt)? else {
            return Ok(false);
        };
        if self.try_command(&line) {
            return Ok(true);
        }
        if !line.trim().is_empty() && self.apply_provider_choice(&line) {
            // A new provider means a fresh key is required.
            return Ok(true);
        }

        let prompt = format!("New {} API key [Enter keeps current]:", self.current_label());
        let Some(secret) = input::read_secret(&prompt)? else {
            return Ok(false);
        };
        let outcome = if secret.is_empty() {
            self.state.controller.toggle_settings()
        } else {
            self.state.controller.submit_credential(&secret)
        };
        if let Err(reason) = outcome {
            debug!(%reason, "settings input ignored");
        }
        Ok(true)
    }

    fn handle_chat_input(&mut self) -> Result<bool, ChatError> {
        let Some(line) = input::read_input(&mut self.editor, "You:")? else {
            return Ok(false);
        };
        if self.try_command(&line) {
            return Ok(true);
        }
        if let Err(reason) = self.state.controller.submit_message(&line) {
            debug!(%reason, "message ignored");
        }
        Ok(true)
    }

    /// Returns true when `line` was a slash command, whatever its outcome.
    fn try_command(&mut self, line: &str) -> bool {
        let Some(result) = self.command_dispatcher.execute_line(line, &mut self.state) else {
            return false;
        };
        self.flash = match result {
            Ok(Some(output)) => Some(Flash::Info(output)),
            Ok(None) => None,
            Err(err) => Some(Flash::Error(err.to_string())),
        };
        true
    }

    /// Returns true when the session switched to a different provider.
    fn apply_provider_choice(&mut self, choice: &str) -> bool {
        match choice.parse::<Provider>() {
            Ok(provider) => self.state.controller.select_provider(provider),
            Err(err) => {
                self.flash = Some(Flash::Error(err.to_string()));
                false
            }
        }
    }

    fn current_label(&self) -> &'static str {
        self.state
            .controller
            .state()
            .provider()
            .map(|provider| provider.label())
            .unwrap_or("Provider")
    }
}
