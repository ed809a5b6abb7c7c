// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chat-cli: client library and CLI for driving a running agent daemon.
//!
//! The library half (client, exit codes) is shared with the human REPL.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod commands;
pub mod env;
pub mod exit_error;

pub use client::{AgentClient, ClientError};
pub use exit_error::ExitError;
