//! Receive timeout specs.

use crate::prelude::*;
use std::time::{Duration, Instant};

#[test]
fn empty_receive_exits_two_after_timeout() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");

    let start = Instant::now();
    let recv = fabric.chat("alice", &["receive", "--timeout", "1"]);
    let elapsed = start.elapsed();

    assert_eq!(recv.status.code(), Some(2));
    let json = parse_stdout(&recv);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["messages"], serde_json::json!([]));
    assert!(
        elapsed >= Duration::from_millis(900),
        "returned before the timeout: {elapsed:?}"
    );
}

#[test]
fn receive_timeout_zero_returns_immediately() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");

    let start = Instant::now();
    let recv = fabric.chat("alice", &["receive", "--timeout", "0"]);

    assert_eq!(recv.status.code(), Some(2));
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "timeout 0 must not wait"
    );
}

#[test]
fn receive_against_missing_agent_exits_one() {
    let fabric = Fabric::new();

    let recv = fabric.chat("ghost", &["receive", "--timeout", "1"]);
    assert_eq!(recv.status.code(), Some(1));
    let json = parse_stdout(&recv);
    assert_eq!(json["status"], "error");
}
