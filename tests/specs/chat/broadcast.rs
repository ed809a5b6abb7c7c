//! Fan-out specs: a dead peer degrades a send, never fails it.

use crate::prelude::*;

#[test]
fn dead_peer_is_reported_and_pruned() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");
    fabric.start_agent("carol");
    fabric.drain("alice");
    fabric.drain("bob");

    // carol dies without a graceful leave
    fabric.kill_agent("carol");

    let send = fabric.chat("alice", &["send", "hello"]);
    assert_eq!(send.status.code(), Some(0), "send must stay ok: {send:?}");
    let json = parse_stdout(&send);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["delivered_to"], serde_json::json!(["bob"]));
    assert!(
        json["warnings"].get("carol").is_some(),
        "carol should appear in warnings: {json}"
    );

    // carol is gone from alice's members on the next status
    let status = fabric.chat("alice", &["status"]);
    assert_eq!(status.status.code(), Some(0));
    let members = &parse_stdout(&status)["data"]["members"];
    assert!(members.get("bob").is_some());
    assert!(members.get("carol").is_none());
}

#[test]
fn send_with_no_peers_reports_empty_delivery() {
    let mut fabric = Fabric::new();
    fabric.start_agent("solo");

    let send = fabric.chat("solo", &["send", "anyone?"]);
    assert_eq!(send.status.code(), Some(0));
    let json = parse_stdout(&send);
    assert_eq!(json["status"], "ok");
    // Bare report: no recipients, no warnings
    assert!(json.get("delivered_to").is_none());
    assert!(json.get("warnings").is_none());
}
