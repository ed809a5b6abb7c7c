// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent name admission rules.

use thiserror::Error;

/// Why a proposed agent name was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("agent name must not be empty")]
    Empty,

    #[error("agent name too long: {0} characters (max {MAX_NAME_LEN})")]
    TooLong(usize),

    #[error("agent name contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Maximum accepted name length.
///
/// Names become socket file names; keep them well under the 108-byte
/// `sun_path` limit even with the chat directory prefix.
pub const MAX_NAME_LEN: usize = 64;

/// Validate a proposed agent name.
///
/// Names must be non-empty, at most [`MAX_NAME_LEN`] characters, and consist
/// of ASCII alphanumerics, `-`, `_`, or `.` — the name is embedded in the
/// endpoint file name, so path separators and control characters are out.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(name.len()));
    }
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.') {
            return Err(NameError::InvalidChar(c));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
