//! Event assertion helpers

use crate::common::harness::TestClient;
use ripplechat::shared::ServerEvent;

/// Pop the next event, panicking with context if the queue is empty.
pub fn expect_event(client: &mut TestClient, context: &str) -> ServerEvent {
    client
        .next_event()
        .unwrap_or_else(|| panic!("expected an event ({}), queue was empty", context))
}

/// Assert the next event is a `call-error` with exactly this message, and
/// that nothing else follows it.
pub fn expect_sole_call_error(client: &mut TestClient, expected: &str) {
    match expect_event(client, "call-error") {
        ServerEvent::CallError { error } => assert_eq!(error, expected),
        other => panic!("expected call-error {:?}, got {:?}", expected, other),
    }
    assert_no_events(client);
}

/// Assert the client's queue is empty.
pub fn assert_no_events(client: &mut TestClient) {
    let events = client.drain();
    assert!(events.is_empty(), "expected no events, got {:?}", events);
}
