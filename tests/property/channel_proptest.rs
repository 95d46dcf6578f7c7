//! Property-based tests for bridge channel keys

use proptest::prelude::*;
use ripplechat::relay::bridge::{ChannelKind, ConversationChannel};

// Conversation ids as they actually occur: opaque tokens without the
// channel separator.
fn conversation_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,32}"
}

proptest! {
    #[test]
    fn test_message_key_round_trips(id in conversation_id()) {
        let channel = ConversationChannel::message(id.as_str().into());
        let parsed = ConversationChannel::parse(&channel.to_string()).unwrap();
        prop_assert_eq!(parsed.kind, ChannelKind::Message);
        prop_assert_eq!(parsed.conversation_id.as_str(), id.as_str());
    }

    #[test]
    fn test_reaction_key_round_trips(id in conversation_id()) {
        let channel = ConversationChannel::reaction(id.as_str().into());
        let parsed = ConversationChannel::parse(&channel.to_string()).unwrap();
        prop_assert_eq!(parsed.kind, ChannelKind::Reaction);
        prop_assert_eq!(parsed.conversation_id.as_str(), id.as_str());
    }

    #[test]
    fn test_message_and_reaction_keys_never_collide(id in conversation_id()) {
        let message = ConversationChannel::message(id.as_str().into());
        let reaction = ConversationChannel::reaction(id.as_str().into());
        prop_assert_ne!(message.to_string(), reaction.to_string());
    }

    #[test]
    fn test_foreign_namespaces_do_not_parse(id in conversation_id()) {
        let foreign = format!("presence:{}", id);
        prop_assert!(ConversationChannel::parse(&foreign).is_none());
        prop_assert!(ConversationChannel::parse(&id).is_none());
    }
}
