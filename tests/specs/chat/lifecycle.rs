//! Shutdown specs: leave command and signal-driven teardown.

use crate::prelude::*;

#[test]
fn leave_shuts_down_and_deregisters() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");
    fabric.drain("alice");

    let leave = fabric.chat("bob", &["leave"]);
    assert_eq!(leave.status.code(), Some(0), "leave failed: {leave:?}");
    let json = parse_stdout(&leave);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "Left chat successfully");

    // The daemon deregisters and removes its endpoint
    assert!(wait_for(SPEC_WAIT_MAX_MS, || {
        fabric.registry().get("bob").is_none() && !fabric.endpoint("bob").exists()
    }));

    // alice hears the leave
    let recv = fabric.chat("alice", &["receive", "--timeout", "5"]);
    assert_eq!(recv.status.code(), Some(0));
    let messages = parse_stdout(&recv)["messages"].clone();
    assert!(messages
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["type"] == "leave" && m["sender"]["name"] == "bob"));
}

#[test]
fn sigterm_broadcasts_leave_and_cleans_up() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");
    fabric.drain("alice");

    fabric.terminate_agent("bob");

    assert!(wait_for(SPEC_WAIT_MAX_MS, || {
        fabric.registry().get("bob").is_none() && !fabric.endpoint("bob").exists()
    }));

    let recv = fabric.chat("alice", &["receive", "--timeout", "5"]);
    assert_eq!(recv.status.code(), Some(0));
    let json = parse_stdout(&recv);
    assert!(json["messages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["type"] == "leave" && m["sender"]["name"] == "bob"));
}

#[test]
fn rejoin_after_leave_succeeds() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");

    let leave = fabric.chat("alice", &["leave"]);
    assert_eq!(leave.status.code(), Some(0));
    assert!(wait_for(SPEC_WAIT_MAX_MS, || fabric
        .registry()
        .get("alice")
        .is_none()));

    // The name is free again
    fabric.start_agent("alice");
    assert!(fabric.registry().get("alice").is_some());
}
