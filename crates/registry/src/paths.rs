// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Well-known filesystem locations for the chat fabric.
//!
//! Everything lives in one chat directory so that the registry and every
//! endpoint are discoverable from an agent name alone.

use std::path::{Path, PathBuf};

/// Resolve the chat directory: `AGENT_CHAT_DIR` > `$XDG_RUNTIME_DIR/claude-agent-chat`
/// > `/tmp/claude-agent-chat`.
///
/// `AGENT_CHAT_DIR` exists for tests, which point it at a private tempdir.
pub fn chat_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AGENT_CHAT_DIR") {
        return PathBuf::from(dir);
    }
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime).join("claude-agent-chat")
}

/// Resolve the chat directory and create it if missing.
pub fn ensure_chat_dir() -> std::io::Result<PathBuf> {
    let dir = chat_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Path of the shared registry file.
pub fn registry_path() -> PathBuf {
    chat_dir().join("registry.json")
}

/// Path of the listening endpoint for `name`, derivable from the name alone.
pub fn endpoint_path(name: &str) -> PathBuf {
    endpoint_path_in(&chat_dir(), name)
}

/// Endpoint path inside an explicit chat directory.
pub fn endpoint_path_in(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.sock"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
