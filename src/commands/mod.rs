pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::session::ChatSessionController;
pub use dispatcher::{CommandDispatcher, create_command_registry};

/// What slash commands act on: the session plus the loop's exit flag.
pub struct ChatState {
    pub controller: ChatSessionController,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(controller: ChatSessionController) -> Self {
        Self {
            controller,
            should_continue: true,
        }
    }
}
