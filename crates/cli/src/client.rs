// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent client: one framed command exchange per connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chat_daemon::protocol::{self, CommandArgs, Envelope, ProtocolError, Reply};
use thiserror::Error;
use tokio::net::UnixStream;

use crate::env;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Agent socket not found: {0}")]
    AgentNotRunning(PathBuf),

    #[error("Cannot connect to agent: {0}")]
    Connect(std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Client for one named agent daemon.
///
/// Stateless: every call opens a fresh connection to the agent's endpoint,
/// writes one framed `command` envelope, reads one framed reply, and closes.
pub struct AgentClient {
    endpoint: PathBuf,
}

impl AgentClient {
    /// Resolve the endpoint for `name` from the well-known chat directory.
    pub fn for_agent(name: &str) -> Result<Self, ClientError> {
        let endpoint = chat_registry::endpoint_path(name);
        if !endpoint.exists() {
            return Err(ClientError::AgentNotRunning(endpoint));
        }
        Ok(Self { endpoint })
    }

    /// Client for an explicit endpoint path (tests, REPL).
    pub fn for_endpoint(endpoint: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    /// One command round-trip bounded by `timeout`.
    pub async fn command(
        &self,
        command: &str,
        args: CommandArgs,
        timeout: Duration,
    ) -> Result<Reply, ClientError> {
        let exchange = async {
            let stream = UnixStream::connect(&self.endpoint)
                .await
                .map_err(ClientError::Connect)?;
            let (mut reader, mut writer) = stream.into_split();

            let envelope = Envelope::Command {
                command: command.to_string(),
                args,
            };
            let data = protocol::encode(&envelope)?;
            protocol::write_message(&mut writer, &data).await?;

            let bytes = protocol::read_message(&mut reader).await?;
            Ok(protocol::decode(&bytes)?)
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| ClientError::Protocol(ProtocolError::Timeout))?
    }

    /// `send`: fan `content` out to every other agent.
    pub async fn send(&self, content: &str) -> Result<Reply, ClientError> {
        let args = CommandArgs {
            content: Some(content.to_string()),
            timeout: None,
        };
        self.command("send", args, env::timeout_send()).await
    }

    /// `receive`: drain queued messages, waiting up to `timeout_secs`.
    pub async fn receive(&self, timeout_secs: u64) -> Result<Reply, ClientError> {
        let args = CommandArgs {
            content: None,
            timeout: Some(timeout_secs),
        };
        let deadline = Duration::from_secs(timeout_secs).saturating_add(env::receive_slack());
        self.command("receive", args, deadline).await
    }

    /// `status`: read-only snapshot of the agent.
    pub async fn status(&self) -> Result<Reply, ClientError> {
        self.command("status", CommandArgs::default(), env::timeout_ipc())
            .await
    }

    /// `leave`: request graceful daemon shutdown.
    pub async fn leave(&self) -> Result<Reply, ClientError> {
        self.command("leave", CommandArgs::default(), env::timeout_ipc())
            .await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
