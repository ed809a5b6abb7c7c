// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chat-repl — interactive human REPL for the agent chat fabric
//!
//! Joins the fabric as a full participant by spawning an agent daemon as a
//! child process, then mirrors arrivals to the terminal while forwarding
//! typed lines as messages. Slash commands cover status and membership.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod daemon_process;
mod display;
mod env;

use std::sync::Arc;
use std::time::Duration;

use chat_cli::client::AgentClient;
use chat_core::AgentProfile;
use chat_daemon::protocol::{Reply, ReplyData};
use clap::Parser;
use tokio::io::AsyncBufReadExt;

use crate::display::Painter;

/// Interval between background receive polls.
const POLL_PAUSE: Duration = Duration::from_millis(1500);

/// Human CLI for multi-agent communication
#[derive(Parser)]
#[command(name = "chat-repl", version, about = "Human CLI for multi-agent communication")]
struct Args {
    /// Agent name (default: human-$USER)
    #[arg(long)]
    name: Option<String>,

    /// Agent context
    #[arg(long, default_value = "human-terminal")]
    context: String,

    /// Agent presentation
    #[arg(long, default_value = "Human operator joining the chat")]
    presentation: String,
}

fn default_name() -> String {
    match std::env::var("USER") {
        Ok(user) if !user.is_empty() => format!("human-{user}"),
        _ => "human-user".to_string(),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let name = args.name.unwrap_or_else(default_name);
    let profile = AgentProfile::new(name, args.context, args.presentation);
    let painter = Painter::new();

    let cwd = std::env::current_dir()?;
    let endpoint = chat_registry::endpoint_path(&profile.name);

    println!("{}", painter.paint(display::GRAY, "Starting agent daemon..."));
    let mut child = daemon_process::start_daemon(&profile, &cwd)?;
    if let Err(e) = daemon_process::wait_for_endpoint(&endpoint, &mut child, env::connect_timeout())
    {
        daemon_process::stop_daemon(&mut child);
        return Err(e.into());
    }

    println!(
        "{}",
        painter.paint(display::GREEN, &format!("Connected as: {}", profile.name))
    );
    println!(
        "{}",
        painter.paint(display::GRAY, &format!("Context: {}", profile.context))
    );
    println!("{}", painter.paint(display::GRAY, "Type /help for commands\n"));

    let client = Arc::new(AgentClient::for_endpoint(&endpoint));

    // Background poll: short receives so arrivals print promptly between
    // keystrokes
    let poll = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            loop {
                if let Ok(Reply::Ok {
                    data: Some(ReplyData::Messages { messages }),
                }) = client.receive(1).await
                {
                    for message in &messages {
                        println!("{}", display::render_message(&painter, message));
                    }
                }
                tokio::time::sleep(POLL_PAUSE).await;
            }
        })
    };

    repl_loop(&client, &painter).await?;

    poll.abort();
    daemon_process::stop_daemon(&mut child);
    println!("Goodbye!");
    Ok(())
}

/// Read lines until `/quit`, EOF, or Ctrl+C.
async fn repl_loop(client: &AgentClient, painter: &Painter) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if let Some(cmd) = line.strip_prefix('/') {
                    match cmd.to_lowercase().as_str() {
                        "quit" | "exit" => break,
                        "help" => print_help(),
                        "status" => show_status(client, painter).await,
                        "members" => show_members(client, painter).await,
                        other => {
                            print_warning(painter, &format!("Unknown command: /{other}"));
                            println!(
                                "{}",
                                painter.paint(display::GRAY, "Type /help for available commands")
                            );
                        }
                    }
                } else {
                    send_line(client, painter, line).await;
                }
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("\nAvailable commands:");
    println!("  /help        - Show this help");
    println!("  /status      - Show agent status");
    println!("  /members     - List connected agents");
    println!("  /quit, /exit - Exit the chat");
    println!("\nAnything else will be sent as a message to all agents.\n");
}

async fn show_status(client: &AgentClient, painter: &Painter) {
    match client.status().await {
        Ok(Reply::Ok {
            data: Some(ReplyData::Status(snapshot)),
        }) => {
            println!("\nAgent: {}", snapshot.agent.name);
            println!("Context: {}", snapshot.agent.context);
            println!("Connected agents: {}", snapshot.members.len());
            println!("Unread messages: {}\n", snapshot.queue_size);
        }
        Ok(Reply::Error { error }) => print_warning(painter, &format!("Error: {error}")),
        Ok(_) => print_warning(painter, "Error: unexpected reply"),
        Err(e) => print_warning(painter, &format!("Error: {e}")),
    }
}

async fn show_members(client: &AgentClient, painter: &Painter) {
    match client.status().await {
        Ok(Reply::Ok {
            data: Some(ReplyData::Status(snapshot)),
        }) => {
            if snapshot.members.is_empty() {
                println!("\nNo other agents connected.\n");
                return;
            }

            println!("\nConnected agents ({}):", snapshot.members.len());
            for (name, member) in &snapshot.members {
                println!("  • {name}");
                println!("    Context: {}", member.context);
                if !member.presentation.is_empty() {
                    println!("    {}", member.presentation);
                }
            }
            println!();
        }
        Ok(Reply::Error { error }) => print_warning(painter, &format!("Error: {error}")),
        Ok(_) => print_warning(painter, "Error: unexpected reply"),
        Err(e) => print_warning(painter, &format!("Error: {e}")),
    }
}

async fn send_line(client: &AgentClient, painter: &Painter, line: &str) {
    match client.send(line).await {
        Ok(Reply::Ok { .. }) => {}
        Ok(Reply::Error { error }) => print_warning(painter, &format!("Error: {error}")),
        Err(e) => print_warning(painter, &format!("Error: {e}")),
    }
}

fn print_warning(painter: &Painter, text: &str) {
    println!("{}", painter.paint(display::YELLOW, text));
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
