// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp formatting shared across the fabric.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with a trailing `Z` (microsecond precision).
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format an ISO-8601 timestamp as wall-clock `HH:MM:SS` for display.
///
/// Returns the input unchanged when it does not parse.
pub fn clock_time(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%H:%M:%S").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
