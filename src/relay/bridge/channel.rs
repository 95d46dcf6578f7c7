/**
 * Bridge Channel Keys
 *
 * Conversation traffic crosses the bridge on string channel keys:
 *
 * - `conversation:{id}` for messages
 * - `conversation:{id}:reaction` for reactions
 *
 * The relay subscribes once to the wildcard `conversation:*` and
 * demultiplexes received frames by parsing the key back into this type.
 */
use crate::shared::ConversationId;
use serde::{Deserialize, Serialize};

/// Wildcard pattern covering every conversation channel.
pub const CHANNEL_PATTERN: &str = "conversation:*";

const PREFIX: &str = "conversation:";
const REACTION_SUFFIX: &str = ":reaction";

/// Which kind of traffic a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Message,
    Reaction,
}

/// A parsed bridge channel key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationChannel {
    pub conversation_id: ConversationId,
    pub kind: ChannelKind,
}

impl ConversationChannel {
    pub fn message(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            kind: ChannelKind::Message,
        }
    }

    pub fn reaction(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            kind: ChannelKind::Reaction,
        }
    }

    /// Parse a raw channel key. Returns `None` for keys outside the
    /// `conversation:` namespace (the wildcard subscription should make
    /// that impossible, but the demultiplexer stays defensive about input
    /// it did not produce).
    pub fn parse(channel: &str) -> Option<Self> {
        let rest = channel.strip_prefix(PREFIX)?;
        if rest.is_empty() {
            return None;
        }
        match rest.strip_suffix(REACTION_SUFFIX) {
            Some(id) if !id.is_empty() => Some(Self::reaction(id.into())),
            _ => Some(Self::message(rest.into())),
        }
    }
}

impl std::fmt::Display for ConversationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ChannelKind::Message => write!(f, "{}{}", PREFIX, self.conversation_id),
            ChannelKind::Reaction => {
                write!(f, "{}{}{}", PREFIX, self.conversation_id, REACTION_SUFFIX)
            }
        }
    }
}
