use crate::providers::Provider;
use crate::session::{Message, Role, SessionMode, SessionState};
use console::{Term, style};
use termimad::MadSkin;

const TITLE: &str = "🤖 Multi-AI Chatbot";

/// Draws the whole view for the current session state.
///
/// Every pass starts from a clean screen, so callers render after each
/// state change rather than patching previous output.
pub fn render(state: &SessionState, credential_notice: bool) {
    let term = Term::stdout();
    if term.is_term() {
        term.clear_screen().ok();
    }

    println!("{}\n", style(TITLE).bold().magenta());

    match state.mode() {
        SessionMode::NeedsProvider => render_provider_menu(None),
        SessionMode::NeedsCredential => {
            if let Some(provider) = state.provider() {
                render_provider_menu(Some(provider));
                render_credential_step(provider);
            }
            println!(
                "\n{}",
                style("Please enter your API key to start chatting.").dim()
            );
        }
        SessionMode::SettingsOpen => {
            if let Some(provider) = state.provider() {
                render_settings(provider);
            }
        }
        SessionMode::Chatting => {
            if let Some(provider) = state.provider() {
                render_transcript(provider, state.transcript());
            }
        }
    }

    if credential_notice {
        println!("\n{}", style("✅ API key set!").bold().green());
    }
}

fn render_provider_menu(current: Option<Provider>) {
    println!("{}", style("1. Choose your AI provider:").bold());
    for (index, provider) in Provider::ALL.iter().enumerate() {
        let line = format!("  {}. {} {}", index + 1, provider.icon(), provider.label());
        if current == Some(*provider) {
            println!("{}", style(line).bold().green());
        } else {
            println!("{}", line);
        }
    }
}

fn render_credential_step(provider: Provider) {
    println!(
        "\n{}",
        style(format!("2. Enter your {} API key:", provider.label())).bold()
    );
}

fn render_settings(provider: Provider) {
    println!("{}", style("⚙️  AI & API Settings").bold().yellow());
    println!(
        "Current provider: {} {}\n",
        provider.icon(),
        style(provider.label()).bold()
    );
    render_provider_menu(Some(provider));
    println!(
        "\n{}",
        style("Pick a provider to switch (resets the chat), or press Enter to keep it.").dim()
    );
}

fn render_transcript(provider: Provider, transcript: &[Message]) {
    println!(
        "{}\n",
        style(format!("Chat with {} {}", provider.icon(), provider.label()))
            .bold()
            .underlined()
    );

    let skin = MadSkin::default();
    for message in transcript {
        match message.role {
            Role::User => {
                println!("{} {}", style("You:").bold().cyan(), message.text());
            }
            Role::Assistant if message.is_pending() => {
                println!(
                    "{} {}",
                    style(format!("{}:", provider.label())).bold().blue(),
                    style(message.text()).dim().italic()
                );
            }
            Role::Assistant => {
                println!("{}", style(format!("{}:", provider.label())).bold().blue());
                print!("{}", skin.term_text(&message.text()));
            }
        }
    }

    println!(
        "\n{}",
        style("Type a message, or /help for commands.").dim()
    );
}

/// Output of a slash command
pub fn display_output(output: &str) {
    println!("{}", output);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("❌").bold().red(), style(message).red());
}
