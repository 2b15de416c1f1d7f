//! foundry-agents CLI binary entry point.

use clap::Parser;
use tracing::{info_span, Instrument};
use tracing_subscriber::EnvFilter;

use foundry_agents::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // One span covers provisioning, runs and teardown of the command.
    let span = info_span!("scenario", command = cli.command.name());
    let Cli { model, command } = cli;
    let result = async move {
        match command {
            Commands::Ask(args) => commands::handle_ask(model, args).await,
            Commands::Chat(args) => commands::handle_chat(model, args).await,
            Commands::Search(args) => commands::handle_search(model, args).await,
            Commands::Ground(args) => commands::handle_ground(model, args).await,
        }
    }
    .instrument(span)
    .await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
