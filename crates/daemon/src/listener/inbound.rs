// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handling of `remote_message` envelopes pushed by peers.

use std::sync::Arc;

use chat_core::{Message, MessageKind};

use crate::protocol::Reply;
use crate::state::AgentState;
use crate::unread;

/// Queue an inbound message and maintain the membership cache.
///
/// `join`/`leave` traffic mutates the members map before queuing; the
/// sender's own echoes are dropped. Always updates the unread side-file and
/// signals waiting receivers.
pub(super) fn handle(state: &Arc<AgentState>, message: Message) -> Reply {
    let sender = message.sender.clone();
    match message.kind {
        MessageKind::Join => {
            if sender.name != state.profile.name {
                state.members.lock().insert(sender.name.clone(), sender);
            }
            state.queue.push(message);
        }
        MessageKind::Leave => {
            state.members.lock().remove(&sender.name);
            state.queue.push(message);
        }
        MessageKind::Message => {
            if sender.name != state.profile.name {
                state.queue.push(message);
            }
        }
    }

    unread::update(&state.unread_path, state.queue.len());
    state.message_event.set();

    Reply::ok()
}

#[cfg(test)]
#[path = "inbound_tests.rs"]
mod tests;
