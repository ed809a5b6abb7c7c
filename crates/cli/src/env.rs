// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Deadline for quick round-trips (status, leave)
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("AGENT_CHAT_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Deadline for a send round-trip.
///
/// Generous: the daemon's fan-out pays up to five seconds per dead peer
/// before it can reply.
pub fn timeout_send() -> Duration {
    parse_duration_ms("AGENT_CHAT_TIMEOUT_SEND_MS").unwrap_or(Duration::from_secs(35))
}

/// Extra slack allowed beyond a receive's own wait bound.
pub fn receive_slack() -> Duration {
    parse_duration_ms("AGENT_CHAT_RECEIVE_SLACK_MS").unwrap_or(Duration::from_secs(5))
}
