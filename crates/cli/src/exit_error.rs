// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed process exit codes for CLI failures.

use thiserror::Error;

/// Exit code when a receive succeeded but returned zero messages.
pub const EXIT_EMPTY_RECEIVE: i32 = 2;

/// Error carrying the process exit code.
///
/// An empty message means the command already printed its output; `main`
/// only sets the exit code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Exit with `code` without printing anything further.
    pub fn silent(code: i32) -> Self {
        Self::new(code, "")
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
