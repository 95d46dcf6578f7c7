//! Call signaling integration tests

use crate::common::{assert_no_events, expect_event, expect_sole_call_error, TestRelay};
use ripplechat::shared::ServerEvent;
use serde_json::json;

#[tokio::test]
async fn test_calling_offline_user_errors_caller_only() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(100);
    caller.join("c1");
    caller.drain();

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 999, "conversationId": "c1"}
    }));

    // Exactly one call-error, and nobody rang.
    expect_sole_call_error(&mut caller, "User offline");
    assert_eq!(relay.state.calls.active_count(), 0);
}

#[tokio::test]
async fn test_calling_from_outside_the_conversation_room() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(50);
    let mut callee = relay.connect(51);
    caller.drain();
    callee.drain();

    // Caller never joined c1.
    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 51, "conversationId": "c1"}
    }));

    expect_sole_call_error(&mut caller, "Not in same conversation");
    assert_no_events(&mut callee);
}

#[tokio::test]
async fn test_full_call_handshake_in_causal_order() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut callee = relay.connect(2);
    caller.join("c1");
    caller.drain();
    callee.drain();

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    match expect_event(&mut callee, "incoming-call") {
        ServerEvent::IncomingCall {
            from_user_id,
            conversation_id,
        } => {
            assert_eq!(from_user_id, 1);
            assert_eq!(conversation_id.as_str(), "c1");
        }
        other => panic!("expected incoming-call, got {:?}", other),
    }

    callee.send(json!({"event": "call-accept", "data": {}}));
    assert!(matches!(
        expect_event(&mut caller, "call-accepted"),
        ServerEvent::CallAccepted { from_user_id: 2 }
    ));

    caller.send(json!({
        "event": "webrtc-offer",
        "data": {
            "toUserId": 2,
            "conversationId": "c1",
            "offer": {"type": "offer", "sdp": "v=0"}
        }
    }));
    match expect_event(&mut callee, "webrtc-offer") {
        ServerEvent::WebrtcOffer {
            offer, from_user_id, ..
        } => {
            assert_eq!(from_user_id, 1);
            assert_eq!(offer["type"], "offer");
        }
        other => panic!("expected webrtc-offer, got {:?}", other),
    }

    callee.send(json!({
        "event": "webrtc-answer",
        "data": {
            "toUserId": 1,
            "conversationId": "c1",
            "answer": {"type": "answer", "sdp": "v=0"}
        }
    }));
    assert!(matches!(
        expect_event(&mut caller, "webrtc-answer"),
        ServerEvent::WebrtcAnswer { from_user_id: 2, .. }
    ));

    caller.send(json!({
        "event": "webrtc-ice",
        "data": {
            "toUserId": 2,
            "conversationId": "c1",
            "candidate": {"candidate": "candidate:0 1 UDP"}
        }
    }));
    assert!(matches!(
        expect_event(&mut callee, "webrtc-ice"),
        ServerEvent::WebrtcIce { from_user_id: 1, .. }
    ));

    // Every signal was delivered exactly once.
    assert_no_events(&mut caller);
    assert_no_events(&mut callee);
}

#[tokio::test]
async fn test_conversation_allows_one_call_at_a_time() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut rival = relay.connect(3);
    let mut callee = relay.connect(2);
    caller.join("c1");
    rival.join("c1");
    for client in [&mut caller, &mut rival, &mut callee] {
        client.drain();
    }

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    callee.drain(); // incoming-call

    rival.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    expect_sole_call_error(&mut rival, "Call already in progress");
    assert_no_events(&mut callee);
}

#[tokio::test]
async fn test_reject_notifies_caller() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut callee = relay.connect(2);
    caller.join("c1");
    caller.drain();
    callee.drain();

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    callee.drain(); // incoming-call

    callee.send(json!({"event": "call-reject", "data": {"conversationId": "c1"}}));
    assert!(matches!(
        expect_event(&mut caller, "call-rejected"),
        ServerEvent::CallRejected { from_user_id: 2 }
    ));
    assert_eq!(relay.state.calls.active_count(), 0);
}

#[tokio::test]
async fn test_accept_without_a_ringing_call_is_an_error() {
    let relay = TestRelay::new();
    let mut loner = relay.connect(5);
    loner.drain();

    loner.send(json!({"event": "call-accept", "data": {}}));
    expect_sole_call_error(&mut loner, "No incoming call");
}

#[tokio::test]
async fn test_hang_up_always_delivers_call_ended() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut callee = relay.connect(2);
    caller.drain();
    callee.drain();

    // No session exists, the peer's UI still needs to close.
    caller.send(json!({
        "event": "call-end",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    assert!(matches!(
        expect_event(&mut callee, "call-ended"),
        ServerEvent::CallEnded { from_user_id: 1 }
    ));
}

#[tokio::test]
async fn test_webrtc_signal_outside_accepted_call_is_refused() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut callee = relay.connect(2);
    caller.join("c1");
    caller.drain();
    callee.drain();

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    callee.drain(); // incoming-call, not yet accepted

    caller.send(json!({
        "event": "webrtc-ice",
        "data": {
            "toUserId": 2,
            "conversationId": "c1",
            "candidate": {"candidate": "candidate:0"}
        }
    }));
    expect_sole_call_error(&mut caller, "No active call");
    assert_no_events(&mut callee);
}

#[tokio::test]
async fn test_disconnect_mid_call_ends_it_for_the_peer() {
    let relay = TestRelay::new();
    let mut caller = relay.connect(1);
    let mut callee = relay.connect(2);
    caller.join("c1");
    caller.drain();
    callee.drain();

    caller.send(json!({
        "event": "call-start",
        "data": {"toUserId": 2, "conversationId": "c1"}
    }));
    callee.drain(); // incoming-call
    callee.send(json!({"event": "call-accept", "data": {}}));
    caller.drain(); // call-accepted

    caller.disconnect();

    assert_eq!(
        expect_event(&mut callee, "presence broadcast"),
        ServerEvent::UserDisconnected(1)
    );
    assert!(matches!(
        expect_event(&mut callee, "call-ended"),
        ServerEvent::CallEnded { from_user_id: 1 }
    ));
    assert_eq!(relay.state.calls.active_count(), 0);
}
