// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chat — multi-agent communication CLI
//!
//! Foreground tool for automations to drive a running agent daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use chat_cli::client::AgentClient;
use chat_cli::commands;
use chat_cli::exit_error::ExitError;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chat", version, about = "Multi-agent communication CLI")]
struct Cli {
    /// Agent name (selects which daemon to drive)
    #[arg(long)]
    agent: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message to all other agents
    Send {
        /// Message content
        message: String,
    },
    /// Receive queued messages
    Receive {
        /// Timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Send a message and wait for a response
    Ask {
        /// Message content
        message: String,
        /// Timeout in seconds to wait for a response
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Show agent status and members
    Status,
    /// Leave the chat gracefully
    Leave,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |err| err.code);
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("Error: {msg}");
        }
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = match AgentClient::for_agent(&cli.agent) {
        Ok(client) => client,
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({"status": "error", "error": e.to_string()})
            );
            return Err(ExitError::silent(1).into());
        }
    };

    match cli.command {
        Commands::Send { message } => commands::send(&client, &message).await,
        Commands::Receive { timeout } => commands::receive(&client, timeout).await,
        Commands::Ask { message, timeout } => commands::ask(&client, &message, timeout).await,
        Commands::Status => commands::status(&client).await,
        Commands::Leave => commands::leave(&client).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
