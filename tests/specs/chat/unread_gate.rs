//! Unread-gate specs: sends are refused until prior traffic is drained.

use crate::prelude::*;

#[test]
fn send_is_refused_until_receive_drains() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");
    fabric.drain("alice");
    fabric.drain("bob");

    let send = fabric.chat("alice", &["send", "x"]);
    assert_eq!(send.status.code(), Some(0), "send failed: {send:?}");

    // bob now has one unread message; his own send must be refused
    let blocked = fabric.chat("bob", &["send", "y"]);
    assert_eq!(blocked.status.code(), Some(1));
    let blocked_json = parse_stdout(&blocked);
    assert_eq!(blocked_json["status"], "error");
    assert_eq!(
        blocked_json["error"],
        "Cannot send: 1 unread message(s). Use \"receive\" first."
    );

    // Draining clears the gate
    let drained = fabric.chat("bob", &["receive", "--timeout", "5"]);
    assert_eq!(drained.status.code(), Some(0));

    let retry = fabric.chat("bob", &["send", "y"]);
    assert_eq!(retry.status.code(), Some(0), "retry failed: {retry:?}");
    assert_eq!(
        parse_stdout(&retry)["delivered_to"],
        serde_json::json!(["alice"])
    );
}
