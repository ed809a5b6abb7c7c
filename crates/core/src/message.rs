// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The chat message format exchanged between daemons.

use serde::{Deserialize, Serialize};

use crate::agent::AgentProfile;
use crate::time_fmt::utc_timestamp;

/// Classification of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Sender entered the fabric; content is its presentation.
    Join,
    /// Sender left the fabric; content is empty.
    Leave,
    /// Free-text chat traffic.
    Message,
}

/// A single chat message as it travels between daemons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `"<sender>-<timestamp>"`, for logging only.
    pub id: String,
    /// ISO-8601 UTC send time with trailing `Z`.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub sender: AgentProfile,
    pub content: String,
}

impl Message {
    fn stamped(kind: MessageKind, sender: &AgentProfile, content: impl Into<String>) -> Self {
        let timestamp = utc_timestamp();
        Self {
            id: format!("{}-{}", sender.name, timestamp),
            timestamp,
            kind,
            sender: sender.clone(),
            content: content.into(),
        }
    }

    /// A `join` announcement carrying the sender's presentation.
    pub fn join(sender: &AgentProfile) -> Self {
        Self::stamped(MessageKind::Join, sender, sender.presentation.clone())
    }

    /// A `leave` announcement with empty content.
    pub fn leave(sender: &AgentProfile) -> Self {
        Self::stamped(MessageKind::Leave, sender, "")
    }

    /// A free-text `message`.
    pub fn text(sender: &AgentProfile, content: impl Into<String>) -> Self {
        Self::stamped(MessageKind::Message, sender, content)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
