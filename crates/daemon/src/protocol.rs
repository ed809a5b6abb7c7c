// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol shared by every socket in the fabric.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

use std::collections::BTreeMap;
use std::time::Duration;

use chat_core::Message;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Outermost framed object on any endpoint.
///
/// `command` envelopes come from local clients driving this daemon;
/// `remote_message` envelopes come from peer daemons delivering traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    Command {
        command: String,
        #[serde(default)]
        args: CommandArgs,
    },
    RemoteMessage {
        message: Message,
    },
}

/// Arguments of a `command` envelope.
///
/// A single bag covers every command; absent fields take their defaults at
/// the point of use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandArgs {
    /// Message body for `send`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Wait bound in seconds for `receive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Reply to any envelope: `{status: ok[, data]}` or `{status: error, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reply {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ReplyData>,
    },
    Error {
        error: String,
    },
}

impl Reply {
    /// Bare `{status: ok}`.
    pub fn ok() -> Self {
        Reply::Ok { data: None }
    }

    /// `{status: ok, data: ...}`.
    pub fn with_data(data: ReplyData) -> Self {
        Reply::Ok { data: Some(data) }
    }

    /// `{status: error, error: ...}`.
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error {
            error: message.into(),
        }
    }
}

/// Payload of a successful reply, distinguished by field shape on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyData {
    Delivery(DeliveryReport),
    Messages { messages: Vec<Message> },
    Status(StatusSnapshot),
}

/// Per-peer outcome of a `send` fan-out.
///
/// Failures never downgrade the reply status; callers surface them as
/// warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered_to: Vec<String>,
    pub failed: BTreeMap<String, String>,
}

/// Snapshot returned by the `status` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub agent: StatusAgent,
    pub members: BTreeMap<String, chat_core::AgentProfile>,
    pub queue_size: usize,
}

/// The reporting agent's own identity in a status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAgent {
    pub name: String,
    pub context: String,
}

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,
}

/// Maximum message size (1 MiB) — refused before allocation.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Deadline for reading the single envelope of an accepted connection.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-peer bound for one transient delivery (connect + frame exchange).
pub const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `receive` wait in seconds.
pub const DEFAULT_RECEIVE_TIMEOUT_SECS: u64 = 30;

/// Encode a message to JSON bytes (without length prefix)
///
/// Use with [`write_message`] which handles the length-prefix wire format.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let json = serde_json::to_vec(msg)?;

    if json.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: json.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    Ok(json)
}

/// Decode a message from wire format
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read a length-prefixed message from an async reader
pub async fn read_message<R: tokio::io::AsyncReadExt + Unpin>(
    reader: &mut R,
) -> Result<Vec<u8>, ProtocolError> {
    // Read length prefix
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed);
        }
        Err(e) => return Err(ProtocolError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    // Read payload
    let mut buf = vec![0u8; len];
    match reader.read_exact(&mut buf).await {
        Ok(_) => Ok(buf),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => Err(ProtocolError::Io(e)),
    }
}

/// Write a length-prefixed message to an async writer
pub async fn write_message<W: tokio::io::AsyncWriteExt + Unpin>(
    writer: &mut W,
    data: &[u8],
) -> Result<(), ProtocolError> {
    let len = data.len();
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    writer.write_all(&(len as u32).to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed envelope with a deadline
pub async fn read_envelope<R: tokio::io::AsyncReadExt + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Vec<u8>, ProtocolError> {
    tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

/// Write a framed reply with a deadline
pub async fn write_reply<W: tokio::io::AsyncWriteExt + Unpin>(
    writer: &mut W,
    reply: &Reply,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let data = encode(reply)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
