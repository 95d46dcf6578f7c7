/**
 * Socket Event Taxonomy
 *
 * This module defines every event that can cross the socket, in both
 * directions, as a closed enumeration with typed payloads. The relay never
 * dispatches on free-form event-name strings: an inbound frame either parses
 * into a `ClientEvent` or it is rejected.
 *
 * # Wire Format
 *
 * Frames are JSON objects with an `event` tag and a `data` payload:
 *
 * ```json
 * {"event": "send-message", "data": {"conversationId": "7", "recipientId": 42, "text": "hi"}}
 * ```
 *
 * Event names are kebab-case and payload fields camelCase, matching the
 * web client.
 *
 * # Payload Pass-Through
 *
 * Message and reaction payloads carry arbitrary content fields (text,
 * attachments, emoji, timestamps) that the relay forwards verbatim. Those
 * land in a flattened JSON map rather than being modeled field-by-field;
 * the relay only interprets the routing fields.
 */
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A user identifier as issued by the auth boundary.
pub type UserId = i64;

/// A conversation identifier in its canonical string form.
///
/// Clients send conversation ids as either JSON strings or numbers; the
/// relay normalizes to the string form, which is also the room name for
/// that conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ConversationId(s),
            Raw::Number(n) => ConversationId(n.to_string()),
        })
    }
}

/// A chat message as it travels through the relay.
///
/// The relay reads the routing fields (`conversationId`, `recipientId` /
/// `recipientIds`, `senderSocketId`) and forwards everything else untouched.
/// `senderSocketId` is stamped by the relay when publishing so the receiving
/// process can suppress the echo back to the originating socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub conversation_id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_ids: Option<Vec<UserId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_socket_id: Option<Uuid>,
    /// Content fields forwarded verbatim (text, attachments, timestamps, ...)
    #[serde(flatten)]
    pub content: serde_json::Map<String, Value>,
}

impl WireMessage {
    /// Resolve the recipient list: an explicit `recipientIds` array wins
    /// over the scalar `recipientId`; neither present means no recipients.
    pub fn recipients(&self) -> Vec<UserId> {
        if let Some(ids) = &self.recipient_ids {
            ids.clone()
        } else if let Some(id) = self.recipient_id {
            vec![id]
        } else {
            Vec::new()
        }
    }

    /// Stamp the originating socket id for downstream echo suppression.
    pub fn with_sender_socket(mut self, socket_id: Uuid) -> Self {
        self.sender_socket_id = Some(socket_id);
        self
    }
}

/// A message reaction as it travels through the relay.
///
/// Reactions are room-scoped: delivery goes to everyone currently joined to
/// the conversation room, so no recipient fields are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReaction {
    pub conversation_id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_socket_id: Option<Uuid>,
    /// Content fields forwarded verbatim (emoji, messageId, ...)
    #[serde(flatten)]
    pub content: serde_json::Map<String, Value>,
}

impl WireReaction {
    pub fn with_sender_socket(mut self, socket_id: Uuid) -> Self {
        self.sender_socket_id = Some(socket_id);
        self
    }
}

/// Payload for `call-start` and `call-end`: who to reach, in which
/// conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub to_user_id: UserId,
    pub conversation_id: ConversationId,
}

/// Payload for `call-accept` and `call-reject`.
///
/// Every field is advisory: the acting user is always taken from the
/// connection's authenticated identity and the notification target from the
/// call session, never from these fields. They exist because deployed
/// clients send them (inconsistently, which is exactly why they are not
/// trusted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

/// Payload for client-originated WebRTC signaling events.
///
/// Exactly one of `offer` / `answer` / `candidate` is expected depending on
/// the event kind; the SDP/candidate bodies are opaque to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebRtcSignal {
    pub to_user_id: UserId,
    pub conversation_id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Value>,
}

/// Payload for `document:update`: a collaborative edit relayed verbatim to
/// everyone else viewing the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub document_id: String,
    pub content: String,
}

/// Every event a client may send to the relay.
///
/// Document events keep their colon-namespaced names; everything else is
/// kebab-case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    SendMessage(WireMessage),
    ReactToMessage(WireReaction),
    JoinConversation(ConversationId),
    LeaveConversation(ConversationId),
    CallStart(CallRequest),
    CallAccept(CallAnswer),
    CallReject(CallAnswer),
    CallEnd(CallRequest),
    WebrtcOffer(WebRtcSignal),
    WebrtcAnswer(WebRtcSignal),
    WebrtcIce(WebRtcSignal),
    #[serde(rename = "document:join")]
    DocumentJoin(String),
    #[serde(rename = "document:update")]
    DocumentUpdate(DocumentUpdate),
}

/// Every event the relay may send to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    ReceiveMessage(WireMessage),
    ReceiveReaction(WireReaction),
    /// Presence snapshot sent to a connection right after it registers.
    OnlineUsers(Vec<UserId>),
    UserConnected(UserId),
    UserDisconnected(UserId),
    IncomingCall {
        from_user_id: UserId,
        conversation_id: ConversationId,
    },
    CallAccepted {
        from_user_id: UserId,
    },
    CallRejected {
        from_user_id: UserId,
    },
    CallEnded {
        from_user_id: UserId,
    },
    /// Signaling precondition failure, sent to the initiating socket only.
    CallError {
        error: String,
    },
    /// Messaging delivery failure acknowledgment to the sender.
    DeliveryError {
        error: String,
    },
    WebrtcOffer {
        offer: Value,
        from_user_id: UserId,
        conversation_id: ConversationId,
    },
    WebrtcAnswer {
        answer: Value,
        from_user_id: UserId,
        conversation_id: ConversationId,
    },
    WebrtcIce {
        candidate: Value,
        from_user_id: UserId,
        conversation_id: ConversationId,
    },
    /// Edit broadcast to the other viewers of a document. Carries only the
    /// content; the room already scopes it to one document.
    #[serde(rename = "document:updated")]
    DocumentUpdated {
        content: String,
    },
}

impl ServerEvent {
    /// Build a `call-error` event from any error exposing a client message.
    pub fn call_error(message: impl Into<String>) -> Self {
        Self::CallError {
            error: message.into(),
        }
    }

    pub fn delivery_error(message: impl Into<String>) -> Self {
        Self::DeliveryError {
            error: message.into(),
        }
    }
}
