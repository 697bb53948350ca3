use crate::providers::Provider;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with Claude, OpenAI, Gemini or Groq from the terminal", long_about = None)]
pub struct Args {
    /// Provider to preselect [possible values: claude, openai, gemini, groq]
    #[arg(short, long)]
    pub provider: Option<Provider>,

    /// Answer with simulated replies instead of calling any provider
    #[arg(long)]
    pub simulate: bool,

    /// Read settings from this file instead of ~/.polychat/config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
