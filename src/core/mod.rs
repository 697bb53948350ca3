pub mod error;

pub use error::{ChatError, InvalidTransition, ProviderError};
