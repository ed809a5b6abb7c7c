// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command drivers: issue one request, print JSON, pick the exit code.
//!
//! Output contract: machine-readable JSON on stdout, human notices on
//! stderr. Exit codes: 0 ok, 1 error, 2 receive/ask drained zero messages.

use anyhow::Result;
use chat_core::Message;
use chat_daemon::protocol::{DeliveryReport, Reply, ReplyData};

use crate::client::{AgentClient, ClientError};
use crate::exit_error::{ExitError, EXIT_EMPTY_RECEIVE};

pub async fn send(client: &AgentClient, message: &str) -> Result<()> {
    let reply = client.send(message).await.map_err(print_client_error)?;

    match reply {
        Reply::Ok {
            data: Some(ReplyData::Delivery(report)),
        } => {
            println!("{}", send_output(&report));
            Ok(())
        }
        other => print_reply_failure(other),
    }
}

pub async fn receive(client: &AgentClient, timeout: u64) -> Result<()> {
    let reply = client.receive(timeout).await.map_err(print_client_error)?;
    print_received(reply)
}

pub async fn ask(client: &AgentClient, message: &str, timeout: u64) -> Result<()> {
    let reply = client.send(message).await.map_err(print_client_error)?;
    match reply {
        Reply::Ok { .. } => {}
        other => return print_reply_failure(other),
    }

    eprintln!(
        "{}",
        serde_json::json!({
            "status": "ok",
            "message": "Message sent, waiting for response..."
        })
    );

    let reply = client.receive(timeout).await.map_err(print_client_error)?;
    print_received(reply)
}

pub async fn status(client: &AgentClient) -> Result<()> {
    let reply = client.status().await.map_err(print_client_error)?;

    match reply {
        Reply::Ok {
            data: Some(ReplyData::Status(snapshot)),
        } => {
            let output = serde_json::json!({"status": "ok", "data": snapshot});
            println!("{}", pretty(&output));
            Ok(())
        }
        other => print_reply_failure(other),
    }
}

pub async fn leave(client: &AgentClient) -> Result<()> {
    let reply = client.leave().await.map_err(print_client_error)?;

    match reply {
        Reply::Ok { .. } => {
            println!(
                "{}",
                serde_json::json!({"status": "ok", "message": "Left chat successfully"})
            );
            Ok(())
        }
        other => print_reply_failure(other),
    }
}

/// Shape a send reply: delivery failures are warnings, never errors.
fn send_output(report: &DeliveryReport) -> serde_json::Value {
    let mut output = serde_json::json!({"status": "ok", "message": "Message sent"});
    if !report.delivered_to.is_empty() {
        output["delivered_to"] = serde_json::json!(report.delivered_to);
    }
    if !report.failed.is_empty() {
        output["warnings"] = serde_json::json!(report.failed);
    }
    output
}

/// Print a receive batch; an empty batch exits with code 2.
fn print_received(reply: Reply) -> Result<()> {
    match reply {
        Reply::Ok {
            data: Some(ReplyData::Messages { messages }),
        } => {
            let output = serde_json::json!({"status": "ok", "messages": messages});
            println!("{}", pretty(&output));
            match receive_exit_code(&messages) {
                0 => Ok(()),
                code => Err(ExitError::silent(code).into()),
            }
        }
        other => print_reply_failure(other),
    }
}

fn receive_exit_code(messages: &[Message]) -> i32 {
    if messages.is_empty() {
        EXIT_EMPTY_RECEIVE
    } else {
        0
    }
}

/// Print an error reply (or an unexpected shape) and exit 1.
fn print_reply_failure(reply: Reply) -> Result<()> {
    let output = match reply {
        Reply::Error { error } => error_json(&error),
        other => error_json(&format!("Unexpected reply: {other:?}")),
    };
    println!("{output}");
    Err(ExitError::silent(1).into())
}

/// Print a client-side failure as an error reply and exit 1.
fn print_client_error(e: ClientError) -> anyhow::Error {
    println!("{}", error_json(&e.to_string()));
    ExitError::silent(1).into()
}

fn error_json(error: &str) -> String {
    serde_json::json!({"status": "error", "error": error}).to_string()
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
