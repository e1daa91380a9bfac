use std::sync::Arc;

use anyhow::{bail, Result};

use crate::config::RelayConfig;
use crate::model::ticket::TicketId;
use crate::relay::Relay;
use crate::server;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Serve { bind: Option<String> },
    Replay { ticket_ids: Vec<TicketId> },
    Help,
}

/// Parse `relay` arguments (program name already stripped).
///
/// Supported forms:
///   relay
///   relay serve [--bind 127.0.0.1:8080]
///   relay replay 1234 5678
///   relay help
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(Command::Serve { bind: None });
    };

    match first.as_str() {
        "serve" => parse_serve_args(rest),
        "replay" => parse_replay_args(rest),
        "help" | "-h" | "--help" => Ok(Command::Help),
        "-b" | "--bind" => parse_serve_args(args),
        other => bail!("Unknown command '{other}'. Run `relay help` for usage."),
    }
}

fn parse_serve_args(args: &[String]) -> Result<Command> {
    let mut bind = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-b" | "--bind" => {
                i += 1;
                match args.get(i) {
                    Some(addr) => bind = Some(addr.clone()),
                    None => bail!("Missing value for --bind flag"),
                }
            }
            other => bail!("Unexpected argument '{other}' for serve"),
        }
        i += 1;
    }

    Ok(Command::Serve { bind })
}

fn parse_replay_args(args: &[String]) -> Result<Command> {
    if args.is_empty() {
        bail!("Usage: relay replay <ticket-id>...\n\nExample:\n  relay replay 1234567890");
    }

    let mut ticket_ids = Vec::with_capacity(args.len());
    for arg in args {
        match TicketId::new(arg.clone()) {
            Some(id) => ticket_ids.push(id),
            None => bail!("Ticket id cannot be empty"),
        }
    }

    Ok(Command::Replay { ticket_ids })
}

pub async fn handle_serve(config: RelayConfig, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.settings.bind.clone());
    let relay = Arc::new(Relay::from_config(&config));
    server::run(relay, &addr).await
}

/// Push tickets through enrich → publish by hand, stopping at the first failure.
pub async fn handle_replay(config: RelayConfig, ticket_ids: Vec<TicketId>) -> Result<()> {
    let relay = Relay::from_config(&config);

    for ticket_id in &ticket_ids {
        match relay.relay_ticket(ticket_id).await {
            Ok(result) => match result.id_text() {
                Some(id) => println!("Ticket {ticket_id} → work item {id}"),
                None => println!("Ticket {ticket_id} → work item (no id returned)"),
            },
            Err(e) => bail!("Ticket {ticket_id}: {e}"),
        }
    }

    Ok(())
}

pub fn print_help() {
    println!("relay — forward HubSpot ticket webhooks to Azure DevOps work items\n");
    println!("USAGE:");
    println!("  relay                         Run the webhook server");
    println!("  relay serve [--bind ADDR]     Run the webhook server on ADDR");
    println!("  relay replay <ticket-id>...   Create work items for tickets by hand");
    println!();
    println!("ENVIRONMENT:");
    println!("  HUBSPOT_ACCESS_TOKEN  HubSpot private app token (required)");
    println!("  ADO_PAT               Azure DevOps personal access token (required)");
    println!("  RELAY_CONFIG          Path to config.toml (optional)");
    println!("  RUST_LOG              Log filter, default \"info\"");
}
