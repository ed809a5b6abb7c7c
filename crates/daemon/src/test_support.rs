// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across the daemon crate's unit tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chat_core::{AgentProfile, RegistryEntry};
use chat_registry::{endpoint_path_in, RegistryStore};
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::event::MessageEvent;
use crate::protocol::{encode, read_message, write_message, Reply};
use crate::queue::MessageQueue;
use crate::state::AgentState;
use crate::unread;

/// An agent state anchored in a tempdir that doubles as chat dir and cwd.
pub(crate) struct TestAgent {
    pub state: Arc<AgentState>,
    /// Owns the chat dir and cwd for the state's lifetime.
    pub dir: TempDir,
}

pub(crate) fn profile(name: &str) -> AgentProfile {
    AgentProfile::new(name, "test", format!("I am {name}"))
}

pub(crate) fn test_agent(name: &str) -> TestAgent {
    let dir = TempDir::new().unwrap();
    let state = state_in(name, dir.path(), dir.path());
    TestAgent { state, dir }
}

pub(crate) fn state_in(name: &str, chat_dir: &Path, cwd: &Path) -> Arc<AgentState> {
    Arc::new(AgentState {
        profile: profile(name),
        endpoint: endpoint_path_in(chat_dir, name),
        unread_path: unread::unread_path(cwd),
        store: RegistryStore::new(chat_dir.join("registry.json")),
        members: Mutex::new(BTreeMap::new()),
        queue: MessageQueue::new(),
        message_event: MessageEvent::new(),
        shutdown: CancellationToken::new(),
    })
}

/// Insert `name` into the store with the given endpoint.
pub(crate) fn register(store: &RegistryStore, name: &str, endpoint: &Path) {
    let entry = RegistryEntry {
        profile: profile(name),
        joined_at: chat_core::utc_timestamp(),
        endpoint: endpoint.to_path_buf(),
    };
    let name = name.to_string();
    store
        .update(move |reg| {
            reg.insert(name, entry);
        })
        .unwrap();
}

/// Spawn a minimal peer endpoint that acks every envelope with `{status: ok}`.
pub(crate) fn spawn_ack_peer(endpoint: &Path) -> tokio::task::JoinHandle<()> {
    let listener = tokio::net::UnixListener::bind(endpoint).unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (mut reader, mut writer) = stream.into_split();
                if read_message(&mut reader).await.is_ok() {
                    let data = encode(&Reply::ok()).unwrap();
                    let _ = write_message(&mut writer, &data).await;
                }
            });
        }
    })
}
