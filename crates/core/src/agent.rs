// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identity types shared by the registry, the daemon, and clients.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The identity an agent presents to its peers.
///
/// Embedded verbatim as the `sender` block of every [`crate::Message`] and
/// as the head of each registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique agent name (see [`crate::validate_name`]).
    pub name: String,
    /// Short project/role descriptor shown in member listings.
    pub context: String,
    /// Longer self-introduction, broadcast as the content of a `join`.
    pub presentation: String,
}

impl AgentProfile {
    pub fn new(
        name: impl Into<String>,
        context: impl Into<String>,
        presentation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            presentation: presentation.into(),
        }
    }
}

/// A registry record for one live daemon.
///
/// Serializes flat: `{name, context, presentation, joined_at, endpoint}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(flatten)]
    pub profile: AgentProfile,
    /// ISO-8601 UTC join time with trailing `Z`.
    pub joined_at: String,
    /// Filesystem path of the daemon's listening socket.
    pub endpoint: PathBuf,
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
