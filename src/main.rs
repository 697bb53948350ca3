use clap::Parser;
use console::style;
use polychat::app::Application;
use polychat::cli::Args;
use polychat::commands::create_command_registry;
use polychat::config::Config;
use polychat::core::error::ChatError;
use polychat::logging;
use polychat::providers::ClientRegistry;
use polychat::session::ChatSessionController;
use std::sync::Arc;
use tracing::info;

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load(args.config.as_deref())?;

    let simulate = args.simulate || config.simulate;
    let clients = if simulate {
        info!("using simulated provider clients");
        ClientRegistry::simulated()
    } else {
        ClientRegistry::from_config(&config)?
    };

    let mut controller = ChatSessionController::new(Arc::new(clients));
    if let Some(provider) = args.provider.or(config.default_provider) {
        controller.select_provider(provider);
    }

    let mut app = Application::new(controller, create_command_registry())?;
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("{} {}", style("Error:").bold().red(), e);
        std::process::exit(1);
    }
}
