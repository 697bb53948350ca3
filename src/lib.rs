//! Terminal chat client for several hosted AI providers.
//!
//! The [`session`] module holds the provider-agnostic state machine; the
//! [`providers`] module supplies one [`providers::ProviderClient`] per service.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod input;
pub mod logging;
pub mod providers;
pub mod session;
