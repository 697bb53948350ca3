pub mod controller;
pub mod state;

pub use controller::{ChatSessionController, PendingRequest, Resolution};
pub use state::{
    Credential, Message, MessageContent, Role, SessionMode, SessionState, THINKING_SUFFIX,
    placeholder_text,
};
