use super::{
    ChatState,
    handler::{
        ClearCommand, HelpCommand, ProviderCommand, ProvidersCommand, QuitCommand,
        SettingsCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, state)
    }

    /// Parses and runs a `/command arg..` line. Returns `None` for non-command input.
    pub fn execute_line(
        &self,
        line: &str,
        state: &mut ChatState,
    ) -> Option<Result<Option<String>, ChatError>> {
        let rest = line.trim().strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let Some(command) = parts.next() else {
            return Some(Err(ChatError::Input("Empty command".to_string())));
        };
        let args: Vec<&str> = parts.collect();
        Some(self.execute(command, &args, state))
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("settings", SettingsCommand);
    registry.register("provider", ProviderCommand);
    registry.register("providers", ProvidersCommand);

    CommandDispatcher::new(Arc::new(registry))
}
