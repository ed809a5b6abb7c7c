// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers for the local control surface.

use std::sync::Arc;
use std::time::Duration;

use chat_core::Message;

use crate::delivery;
use crate::protocol::{
    CommandArgs, Reply, ReplyData, StatusAgent, StatusSnapshot, DEFAULT_RECEIVE_TIMEOUT_SECS,
};
use crate::state::AgentState;
use crate::unread;

pub(super) async fn handle(state: &Arc<AgentState>, command: &str, args: CommandArgs) -> Reply {
    match command {
        "send" => handle_send(state, args).await,
        "receive" => handle_receive(state, args).await,
        "status" => handle_status(state),
        "leave" => handle_leave(state),
        other => Reply::error(format!("Unknown command: {other}")),
    }
}

/// `send`: fan the content out to every peer.
///
/// Refused while unread messages are queued — the turn-taking gate that
/// keeps automations from talking past each other.
async fn handle_send(state: &Arc<AgentState>, args: CommandArgs) -> Reply {
    let unread = state.queue.len();
    if unread > 0 {
        return Reply::error(format!(
            "Cannot send: {unread} unread message(s). Use \"receive\" first."
        ));
    }

    let content = args.content.unwrap_or_default();
    let message = Message::text(&state.profile, content);
    let report = delivery::broadcast(state, &message).await;

    Reply::with_data(ReplyData::Delivery(report))
}

/// `receive`: drain the queue, waiting up to the requested timeout for the
/// first arrival. An empty batch after the timeout is success, not an error.
async fn handle_receive(state: &Arc<AgentState>, args: CommandArgs) -> Reply {
    let timeout = Duration::from_secs(args.timeout.unwrap_or(DEFAULT_RECEIVE_TIMEOUT_SECS));

    // Clear before draining; an arrival between the drain and the wait
    // re-raises the event, so the wait cannot miss it.
    state.message_event.clear();
    let mut messages = state.queue.drain();

    if messages.is_empty() && state.message_event.wait(timeout).await {
        messages = state.queue.drain();
    }

    unread::clear(&state.unread_path);

    Reply::with_data(ReplyData::Messages { messages })
}

/// `status`: read-only snapshot of identity, members, and queue depth.
fn handle_status(state: &Arc<AgentState>) -> Reply {
    let members = state.members.lock().clone();
    Reply::with_data(ReplyData::Status(StatusSnapshot {
        agent: StatusAgent {
            name: state.profile.name.clone(),
            context: state.profile.context.clone(),
        },
        members,
        queue_size: state.queue.len(),
    }))
}

/// `leave`: acknowledge the request for graceful shutdown.
///
/// The connection handler trips the shutdown flag after this reply has been
/// written; the main loop then runs the full teardown (leave broadcast,
/// deregistration, file cleanup).
fn handle_leave(_state: &Arc<AgentState>) -> Reply {
    Reply::ok()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
