use super::ChatState;
use crate::core::error::ChatError;
use crate::providers::Provider;

use console::style;
use tracing::debug;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct SettingsCommand;
pub struct ProviderCommand;
pub struct ProvidersCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            HelpCommand.help().to_string(),
            ProviderCommand.help().to_string(),
            ProvidersCommand.help().to_string(),
            SettingsCommand.help().to_string(),
            ClearCommand.help().to_string(),
            QuitCommand.help().to_string(),
        ];
        Ok(Some(help_text.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/help - Show this help message"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        match state.controller.clear_chat() {
            Ok(()) => Ok(Some("Chat history cleared.".to_string())),
            Err(reason) => {
                debug!(%reason, "clear ignored");
                Ok(None)
            }
        }
    }

    fn help(&self) -> &'static str {
        "/clear - Clear the chat transcript"
    }
}

impl CommandHandler for SettingsCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        if let Err(reason) = state.controller.toggle_settings() {
            debug!(%reason, "settings toggle ignored");
        }
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/settings - Show or hide the provider and API key settings"
    }
}

impl CommandHandler for ProviderCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(name) = args.first() else {
            let current = match state.controller.state().provider() {
                Some(provider) => format!("Current provider: {}", provider.label()),
                None => "No provider selected.".to_string(),
            };
            return Ok(Some(current));
        };

        let provider: Provider = name
            .parse()
            .map_err(|e| ChatError::Input(format!("{}", e)))?;

        if state.controller.select_provider(provider) {
            Ok(Some(format!(
                "Switched to {}. Enter your {} API key to continue.",
                provider.label(),
                provider.label()
            )))
        } else {
            Ok(Some(format!("Already using {}.", provider.label())))
        }
    }

    fn help(&self) -> &'static str {
        "/provider [name] - Show or change the AI provider (resets the chat)"
    }
}

impl CommandHandler for ProvidersCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let current = state.controller.state().provider();
        let lines: Vec<String> = Provider::ALL
            .iter()
            .enumerate()
            .map(|(index, provider)| {
                let marker = if current == Some(*provider) { "*" } else { " " };
                format!(
                    "{} {}. {} {} ({})",
                    marker,
                    index + 1,
                    provider.icon(),
                    provider.label(),
                    provider.id()
                )
            })
            .collect();
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/providers - List supported AI providers"
    }
}
