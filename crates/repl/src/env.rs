// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the REPL.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Explicit agentd binary path override
pub fn daemon_binary() -> Option<String> {
    std::env::var("AGENT_CHAT_DAEMON_BINARY").ok()
}

/// How long to wait for the spawned daemon's endpoint to appear
pub fn connect_timeout() -> Duration {
    parse_duration_ms("AGENT_CHAT_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval while waiting for the endpoint
pub fn poll_interval() -> Duration {
    parse_duration_ms("AGENT_CHAT_POLL_MS").unwrap_or(Duration::from_millis(100))
}
