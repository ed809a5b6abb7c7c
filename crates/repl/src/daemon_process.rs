// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process management for the REPL.
//!
//! Functions for locating, starting, and stopping the agentd child process.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use chat_core::AgentProfile;
use thiserror::Error;

/// Daemon supervision errors
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Failed to start agent daemon: {0}")]
    SpawnFailed(std::io::Error),

    #[error("Agent daemon exited during startup ({0})")]
    EarlyExit(std::process::ExitStatus),

    #[error("Agent daemon did not start in time")]
    StartTimeout,
}

/// Locate the agentd binary: env override, then a sibling of the current
/// executable, then `PATH`.
pub fn find_daemon_binary() -> PathBuf {
    if let Some(path) = crate::env::daemon_binary() {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("agentd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("agentd")
}

/// Spawn agentd detached from the terminal, anchored at `cwd`.
pub fn start_daemon(profile: &AgentProfile, cwd: &Path) -> Result<Child, DaemonError> {
    Command::new(find_daemon_binary())
        .arg("--name")
        .arg(&profile.name)
        .arg("--context")
        .arg(&profile.context)
        .arg("--presentation")
        .arg(&profile.presentation)
        .arg("--cwd")
        .arg(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(DaemonError::SpawnFailed)
}

/// Wait for the daemon's endpoint to appear, watching for early exit.
pub fn wait_for_endpoint(
    endpoint: &Path,
    child: &mut Child,
    timeout: Duration,
) -> Result<(), DaemonError> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if endpoint.exists() {
            // Extra beat for the listener to start accepting
            std::thread::sleep(Duration::from_millis(200));
            return Ok(());
        }
        if let Ok(Some(status)) = child.try_wait() {
            return Err(DaemonError::EarlyExit(status));
        }
        std::thread::sleep(crate::env::poll_interval());
    }
    Err(DaemonError::StartTimeout)
}

/// Stop the daemon: SIGTERM, a grace period for the leave broadcast, then
/// SIGKILL.
pub fn stop_daemon(child: &mut Child) {
    kill_signal("-15", child.id());

    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        if matches!(child.try_wait(), Ok(Some(_))) {
            return;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let _ = child.kill();
    let _ = child.wait();
}

/// Execute kill with the given signal and PID
fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
