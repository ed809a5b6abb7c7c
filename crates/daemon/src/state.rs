// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared daemon context for all connection handlers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chat_core::AgentProfile;
use chat_registry::RegistryStore;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::event::MessageEvent;
use crate::queue::MessageQueue;

/// Everything a connection handler needs, shared behind an `Arc`.
pub struct AgentState {
    /// This daemon's identity.
    pub profile: AgentProfile,
    /// Listening endpoint path (unlinked at shutdown).
    pub endpoint: PathBuf,
    /// `.unread-messages` location under the agent's working directory.
    pub unread_path: PathBuf,
    /// Registry handle for membership refresh and peer lookup.
    pub store: RegistryStore,
    /// Cached registry minus self. Read under lock, write under lock;
    /// references never escape the lock.
    pub members: Mutex<BTreeMap<String, AgentProfile>>,
    /// Inbound message queue.
    pub queue: MessageQueue,
    /// Wakeup signal for blocked receivers.
    pub message_event: MessageEvent,
    /// Cooperative shutdown flag observed by the accept loop.
    pub shutdown: CancellationToken,
}

impl AgentState {
    /// Replace the members cache with `registry minus self`.
    pub fn refresh_members(&self, registry: &chat_registry::Registry) {
        let mut members = self.members.lock();
        members.clear();
        for (name, entry) in registry {
            if *name != self.profile.name {
                members.insert(name.clone(), entry.profile.clone());
            }
        }
    }

    /// Copy of the current member names.
    pub fn member_names(&self) -> Vec<String> {
        self.members.lock().keys().cloned().collect()
    }
}
