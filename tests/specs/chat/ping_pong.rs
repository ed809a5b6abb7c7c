//! Two-party ping-pong specs.

use crate::prelude::*;

#[test]
fn message_flows_from_sender_to_receiver() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");

    // Both daemons appear in the registry
    let registry = fabric.registry();
    assert!(registry.get("alice").is_some());
    assert!(registry.get("bob").is_some());

    // alice saw bob's join announcement; drain it to open the send gate
    let joins = fabric.chat("alice", &["receive", "--timeout", "5"]);
    assert_eq!(joins.status.code(), Some(0));
    let joins_json = parse_stdout(&joins);
    let join_messages = joins_json["messages"].as_array().unwrap();
    assert!(join_messages
        .iter()
        .any(|m| m["type"] == "join" && m["sender"]["name"] == "bob"));

    let send = fabric.chat("alice", &["send", "hi"]);
    assert_eq!(send.status.code(), Some(0), "send failed: {send:?}");
    let send_json = parse_stdout(&send);
    assert_eq!(send_json["status"], "ok");
    assert_eq!(send_json["delivered_to"], serde_json::json!(["bob"]));

    // The unread hint appears in bob's cwd while the message waits
    assert!(wait_for(SPEC_WAIT_MAX_MS, || fabric
        .unread_file("bob")
        .exists()));
    assert_eq!(
        std::fs::read_to_string(fabric.unread_file("bob")).unwrap(),
        "1"
    );

    let recv = fabric.chat("bob", &["receive", "--timeout", "5"]);
    assert_eq!(recv.status.code(), Some(0));
    let recv_json = parse_stdout(&recv);
    let messages = recv_json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "message");
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[0]["sender"]["name"], "alice");

    // The unread hint is gone after a successful receive
    assert!(!fabric.unread_file("bob").exists());
}

#[test]
fn ask_round_trips_an_answer() {
    let mut fabric = Fabric::new();
    fabric.start_agent("alice");
    fabric.start_agent("bob");
    fabric.drain("alice");

    let ask = fabric.chat_spawn("alice", &["ask", "ping?", "--timeout", "10"]);

    // bob hears the question and answers
    let question = fabric.chat("bob", &["receive", "--timeout", "5"]);
    assert_eq!(question.status.code(), Some(0));
    assert_eq!(parse_stdout(&question)["messages"][0]["content"], "ping?");

    let answer = fabric.chat("bob", &["send", "pong"]);
    assert_eq!(answer.status.code(), Some(0));

    let output = ask.wait_with_output().expect("ask did not finish");
    assert_eq!(output.status.code(), Some(0), "ask failed: {output:?}");
    let json = parse_stdout(&output);
    assert_eq!(json["messages"][0]["content"], "pong");
    assert_eq!(json["messages"][0]["sender"]["name"], "bob");
}
