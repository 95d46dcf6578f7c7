//! Document collaboration integration tests

use crate::common::{assert_no_events, expect_event, TestRelay};
use ripplechat::shared::ServerEvent;
use serde_json::json;

#[tokio::test]
async fn test_edit_fans_out_to_other_viewers() {
    let relay = TestRelay::new();
    let mut editor = relay.connect(1);
    let mut viewer = relay.connect(2);
    editor.send(json!({"event": "document:join", "data": "doc-7"}));
    viewer.send(json!({"event": "document:join", "data": "doc-7"}));
    editor.drain();
    viewer.drain();

    editor.send(json!({
        "event": "document:update",
        "data": {"documentId": "doc-7", "content": "second draft"}
    }));

    match expect_event(&mut viewer, "document:updated") {
        ServerEvent::DocumentUpdated { content } => assert_eq!(content, "second draft"),
        other => panic!("expected document:updated, got {:?}", other),
    }
    // The editor already holds the content.
    assert_no_events(&mut editor);
}

#[tokio::test]
async fn test_edit_does_not_leak_across_documents() {
    let relay = TestRelay::new();
    let mut editor = relay.connect(1);
    let mut other = relay.connect(2);
    editor.send(json!({"event": "document:join", "data": "doc-7"}));
    other.send(json!({"event": "document:join", "data": "doc-8"}));
    editor.drain();
    other.drain();

    editor.send(json!({
        "event": "document:update",
        "data": {"documentId": "doc-7", "content": "private"}
    }));

    assert_no_events(&mut other);
}

#[tokio::test]
async fn test_disconnect_leaves_document_rooms() {
    let relay = TestRelay::new();
    let viewer = relay.connect(1);
    viewer.send(json!({"event": "document:join", "data": "doc-7"}));
    let conn_id = viewer.conn_id;
    assert!(relay.state.fanout.rooms.is_member(conn_id, "document:doc-7"));

    viewer.disconnect();
    assert!(!relay.state.fanout.rooms.is_member(conn_id, "document:doc-7"));
}
