//! Property-based tests for wire events

use proptest::prelude::*;
use ripplechat::shared::{ClientEvent, ServerEvent, WireMessage};

proptest! {
    #[test]
    fn test_message_content_survives_the_relay_encoding(
        text in ".*",
        recipients in prop::collection::vec(1i64..10_000, 1..8),
    ) {
        let frame = serde_json::json!({
            "conversationId": "c1",
            "recipientIds": recipients.clone(),
            "text": text.clone()
        });
        let message: WireMessage = serde_json::from_value(frame).unwrap();
        prop_assert_eq!(message.recipients(), recipients);

        // What goes over the bridge decodes to the same message.
        let published = serde_json::to_string(&message).unwrap();
        let received: WireMessage = serde_json::from_str(&published).unwrap();
        prop_assert_eq!(&received.content["text"], &serde_json::json!(text));
        prop_assert_eq!(received, message);
    }

    #[test]
    fn test_scalar_recipient_only_used_without_a_list(
        scalar in 1i64..10_000,
        list in prop::collection::vec(1i64..10_000, 0..4),
    ) {
        let mut frame = serde_json::json!({
            "conversationId": "c1",
            "recipientId": scalar
        });
        if !list.is_empty() {
            frame["recipientIds"] = serde_json::json!(list.clone());
        }
        let message: WireMessage = serde_json::from_value(frame).unwrap();
        let expected = if list.is_empty() { vec![scalar] } else { list };
        prop_assert_eq!(message.recipients(), expected);
    }

    #[test]
    fn test_client_event_round_trips(user in 1i64..10_000, conversation in "[a-z0-9]{1,16}") {
        let frame = serde_json::json!({
            "event": "call-start",
            "data": {"toUserId": user, "conversationId": conversation}
        });
        let event: ClientEvent = serde_json::from_value(frame.clone()).unwrap();
        prop_assert_eq!(serde_json::to_value(&event).unwrap(), frame);
    }

    #[test]
    fn test_server_events_always_carry_a_kebab_case_tag(user in 1i64..10_000) {
        for event in [
            ServerEvent::UserConnected(user),
            ServerEvent::UserDisconnected(user),
            ServerEvent::CallAccepted { from_user_id: user },
            ServerEvent::CallEnded { from_user_id: user },
        ] {
            let json = serde_json::to_value(&event).unwrap();
            let tag = json["event"].as_str().unwrap();
            prop_assert!(tag.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
        }
    }
}
