// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer-to-peer message delivery over transient connections.
//!
//! Each delivery opens a fresh connection to the recipient's endpoint,
//! writes one framed `remote_message` envelope, reads one framed reply, and
//! closes. A slow or dead peer costs at most [`PEER_TIMEOUT`] and never
//! stalls the other peers.

use std::path::Path;

use chat_core::Message;
use tokio::net::UnixStream;
use tracing::debug;

use crate::protocol::{
    encode, read_message, write_message, DeliveryReport, Envelope, ProtocolError, PEER_TIMEOUT,
};
use crate::state::AgentState;

/// Deliver one message to a single peer endpoint.
pub async fn deliver(endpoint: &Path, message: &Message) -> Result<(), ProtocolError> {
    let exchange = async {
        let stream = UnixStream::connect(endpoint).await?;
        let (mut reader, mut writer) = stream.into_split();

        let envelope = Envelope::RemoteMessage {
            message: message.clone(),
        };
        let data = encode(&envelope)?;
        write_message(&mut writer, &data).await?;

        // The peer's ack; content is irrelevant, arrival is the point
        let _reply = read_message(&mut reader).await?;
        Ok(())
    };

    tokio::time::timeout(PEER_TIMEOUT, exchange)
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

/// Fan a message out to every current peer, collecting a delivery report.
///
/// Re-reads the registry first and refreshes the members cache, so a `send`
/// always targets the latest membership. Unreachable peers are recorded in
/// the report and dropped from the cache; they never fail the broadcast.
pub async fn broadcast(state: &AgentState, message: &Message) -> DeliveryReport {
    let registry = state.store.read();
    state.refresh_members(&registry);

    let peers: Vec<_> = registry
        .iter()
        .filter(|(name, _)| **name != state.profile.name)
        .map(|(name, entry)| (name.clone(), entry.endpoint.clone()))
        .collect();

    let mut report = DeliveryReport::default();
    for (name, endpoint) in peers {
        match deliver(&endpoint, message).await {
            Ok(()) => report.delivered_to.push(name),
            Err(e) => {
                state.members.lock().remove(&name);
                report.failed.insert(name, e.to_string());
            }
        }
    }
    report
}

/// Best-effort `leave` fan-out to the current members snapshot.
///
/// Used during shutdown; failures are expected (peers may already be gone)
/// and only logged.
pub async fn broadcast_leave(state: &AgentState) {
    let names = state.member_names();
    if names.is_empty() {
        return;
    }

    let registry = state.store.read();
    let message = Message::leave(&state.profile);
    for name in names {
        let Some(entry) = registry.get(&name) else {
            continue;
        };
        if let Err(e) = deliver(&entry.endpoint, &message).await {
            debug!("could not notify {} of leave: {}", name, e);
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
