// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accept loop and per-connection handling.
//!
//! Each accepted connection carries exactly one framed envelope: the handler
//! reads it, dispatches, writes one framed reply, and closes. Handlers run
//! as independent tasks so a slow client never blocks the accept loop.

mod commands;
mod inbound;

use std::sync::Arc;

use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

use crate::protocol::{
    read_envelope, write_reply, Envelope, ProtocolError, Reply, CONNECTION_TIMEOUT,
};
use crate::state::AgentState;

/// Deadline for writing a reply back to a connected client.
const REPLY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Listener task for accepting endpoint connections.
pub struct Listener {
    socket: UnixListener,
    state: Arc<AgentState>,
}

impl Listener {
    pub fn new(socket: UnixListener, state: Arc<AgentState>) -> Self {
        Self { socket, state }
    }

    /// Run the accept loop until shutdown, spawning a task per connection.
    ///
    /// In-flight handlers are left to complete; only the accept loop stops.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.state.shutdown.cancelled() => break,
                accepted = self.socket.accept() => match accepted {
                    Ok((stream, _)) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, &state).await {
                                match e {
                                    ProtocolError::ConnectionClosed => debug!("client disconnected"),
                                    ProtocolError::Timeout => warn!("connection timeout"),
                                    _ => error!("connection error: {}", e),
                                }
                            }
                        });
                    }
                    Err(e) => {
                        error!("accept error: {}", e);
                    }
                }
            }
        }
    }
}

/// Handle a single connection: one envelope in, one reply out.
///
/// A `leave` command trips the shutdown flag only after its reply has been
/// flushed, so the client never loses the acknowledgement to the teardown.
async fn handle_connection(
    stream: UnixStream,
    state: &Arc<AgentState>,
) -> Result<(), ProtocolError> {
    let (mut reader, mut writer) = stream.into_split();

    let bytes = read_envelope(&mut reader, CONNECTION_TIMEOUT).await?;
    let (reply, shutdown_after_reply) = dispatch(&bytes, state).await;

    debug!("sending reply: {:?}", reply);

    let written = match write_reply(&mut writer, &reply, REPLY_TIMEOUT).await {
        Ok(()) => Ok(()),
        // The client hung up before reading its reply; its loss, not ours
        Err(ProtocolError::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e),
    };

    if shutdown_after_reply {
        state.shutdown.cancel();
    }

    written
}

/// Decode the envelope bytes and route to the matching handler.
///
/// Every failure mode becomes a `{status: error}` reply; nothing here can
/// take the daemon down. The second value asks the caller to initiate
/// shutdown once the reply is out.
async fn dispatch(bytes: &[u8], state: &Arc<AgentState>) -> (Reply, bool) {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => return (Reply::error(format!("Invalid JSON: {e}")), false),
    };

    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_owned);
    match tag.as_deref() {
        Some("command") | Some("remote_message") => {
            match serde_json::from_value::<Envelope>(value) {
                Ok(Envelope::Command { command, args }) => {
                    debug!(command = %command, "received command");
                    let shutdown = command == "leave";
                    (commands::handle(state, &command, args).await, shutdown)
                }
                Ok(Envelope::RemoteMessage { message }) => {
                    debug!(
                        id = %message.id,
                        sender = %message.sender.name,
                        "received remote message"
                    );
                    (inbound::handle(state, message), false)
                }
                Err(e) => (Reply::error(format!("Malformed envelope: {e}")), false),
            }
        }
        other => (
            Reply::error(format!("Unknown message type: {}", other.unwrap_or("none"))),
            false,
        ),
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
