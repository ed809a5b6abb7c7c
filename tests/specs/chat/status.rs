//! Status specs: read-only snapshots of identity, members, and queue depth.

use crate::prelude::*;

#[test]
fn status_reports_members_and_queue_depth() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");

    // bob joined second: no unread traffic, alice in members
    let bob = fabric.chat("bob", &["status"]);
    assert_eq!(bob.status.code(), Some(0));
    let bob_json = parse_stdout(&bob);
    assert_eq!(bob_json["status"], "ok");
    assert_eq!(bob_json["data"]["agent"]["name"], "bob");
    assert_eq!(bob_json["data"]["agent"]["context"], "bob-project");
    assert_eq!(bob_json["data"]["queue_size"], 0);
    assert!(bob_json["data"]["members"].get("alice").is_some());

    // alice holds bob's join announcement unread
    let alice = fabric.chat("alice", &["status"]);
    assert_eq!(parse_stdout(&alice)["data"]["queue_size"], 1);
}

#[test]
fn status_is_read_only() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");

    let first = parse_stdout(&fabric.chat("alice", &["status"]));
    let second = parse_stdout(&fabric.chat("alice", &["status"]));

    assert_eq!(first["data"], second["data"]);
}
