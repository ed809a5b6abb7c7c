// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: admission, registration, teardown.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chat_core::{AgentProfile, Message, RegistryEntry};
use chat_registry::{endpoint_path_in, ensure_chat_dir, probe, RegistryStore};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::delivery;
use crate::event::MessageEvent;
use crate::queue::MessageQueue;
use crate::state::AgentState;
use crate::unread;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// This daemon's identity.
    pub profile: AgentProfile,
    /// Working directory hosting the unread side-file.
    pub cwd: PathBuf,
    /// Chat directory shared by every agent on the machine.
    pub chat_dir: PathBuf,
    /// This daemon's listening endpoint.
    pub endpoint: PathBuf,
    /// Path to the daemon log file.
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve paths for an identity, creating the chat directory.
    ///
    /// When `cwd` is absent the daemon's own working directory is used;
    /// callers that want another anchor (the REPL does) pass it explicitly.
    pub fn load(profile: AgentProfile, cwd: Option<PathBuf>) -> Result<Self, LifecycleError> {
        chat_core::validate_name(&profile.name)?;

        let chat_dir = ensure_chat_dir()?;
        let cwd = match cwd {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(Self {
            endpoint: endpoint_path_in(&chat_dir, &profile.name),
            log_path: chat_dir.join(format!("{}.log", profile.name)),
            chat_dir,
            cwd,
            profile,
        })
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid agent name: {0}")]
    InvalidName(#[from] chat_core::NameError),

    #[error("Agent name '{0}' already in use")]
    NameInUse(String),

    #[error("Failed to bind endpoint at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] chat_registry::RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of daemon startup — the shared state plus the bound listener to
/// hand to [`crate::listener::Listener`].
pub struct StartupResult {
    pub state: Arc<AgentState>,
    pub listener: UnixListener,
}

/// Start the daemon: claim the name, bind the endpoint, announce the join.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    let store = RegistryStore::new(config.chat_dir.join("registry.json"));

    // Admission: a live holder of the name is fatal; a stale entry from a
    // crashed daemon is evicted when we claim the name below. Probing
    // before binding keeps a live holder's endpoint file untouched.
    let registry = store.read();
    if let Some(existing) = registry.get(&config.profile.name) {
        if probe(&existing.endpoint).await {
            return Err(LifecycleError::NameInUse(config.profile.name.clone()));
        }
        info!(
            "evicting stale registry entry for '{}'",
            config.profile.name
        );
    }

    // Bind the endpoint, replacing any stale socket file
    if config.endpoint.exists() {
        std::fs::remove_file(&config.endpoint)?;
    }
    let listener = UnixListener::bind(&config.endpoint)
        .map_err(|e| LifecycleError::BindFailed(config.endpoint.clone(), e))?;

    // Claim the name under one exclusive lock
    let entry = RegistryEntry {
        profile: config.profile.clone(),
        joined_at: chat_core::utc_timestamp(),
        endpoint: config.endpoint.clone(),
    };
    let name = config.profile.name.clone();
    let registry = match store.update(move |reg| {
        reg.insert(name, entry);
    }) {
        Ok(registry) => registry,
        Err(e) => {
            let _ = std::fs::remove_file(&config.endpoint);
            return Err(e.into());
        }
    };

    info!("joined; {} member(s) present", registry.len());

    let state = Arc::new(AgentState {
        profile: config.profile.clone(),
        endpoint: config.endpoint.clone(),
        unread_path: unread::unread_path(&config.cwd),
        store,
        members: Mutex::new(BTreeMap::new()),
        queue: MessageQueue::new(),
        message_event: MessageEvent::new(),
        shutdown: CancellationToken::new(),
    });
    state.refresh_members(&registry);

    // Announce the join; per-peer failures are logged, not fatal
    let join = Message::join(&state.profile);
    let report = delivery::broadcast(&state, &join).await;
    for (peer, reason) in &report.failed {
        warn!("could not notify {} of join: {}", peer, reason);
    }

    Ok(StartupResult { state, listener })
}

/// Graceful teardown: leave broadcast, deregistration, scratch-file removal.
///
/// Safe to run after a `leave` command or a signal; every step is
/// best-effort so a half-torn-down fabric cannot wedge the exit.
pub async fn shutdown(state: &AgentState) {
    info!("shutting down...");

    // Stop accepting new connections (idempotent when a leave command
    // already tripped the flag)
    state.shutdown.cancel();

    // Best-effort leave to the current members snapshot
    delivery::broadcast_leave(state).await;

    // Release the name
    let name = state.profile.name.clone();
    if let Err(e) = state.store.update(move |reg| {
        reg.remove(&name);
    }) {
        warn!("failed to deregister: {}", e);
    }

    // Remove the endpoint file
    if state.endpoint.exists() {
        if let Err(e) = std::fs::remove_file(&state.endpoint) {
            warn!("failed to remove endpoint file: {}", e);
        }
    }

    // Remove the unread side-file
    unread::clear(&state.unread_path);

    info!("shutdown complete");
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
