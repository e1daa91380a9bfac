mod cli;
mod config;
mod error;
mod logging;
mod model;
mod providers;
mod relay;
mod server;

use anyhow::Result;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;

    if command == Command::Help {
        cli::print_help();
        return Ok(());
    }

    logging::init()?;

    // Secrets are read once here; request handling never touches the environment.
    let config = config::load_config()?;

    match command {
        Command::Serve { bind } => cli::handle_serve(config, bind).await,
        Command::Replay { ticket_ids } => cli::handle_replay(config, ticket_ids).await,
        Command::Help => Ok(()),
    }
}
