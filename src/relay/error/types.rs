/**
 * Relay Error Types
 *
 * This module defines error types specific to the relay. These errors are
 * used in socket event handlers and, where the contract says so, are
 * reported back to the initiating connection as `call-error` or
 * `delivery-error` events.
 *
 * # Error Categories
 *
 * ## Signaling Errors
 *
 * Call-signaling preconditions that fail synchronously:
 * - Callee not present in the presence registry
 * - Caller not joined to the conversation room
 * - No matching call session for an accept/reject/WebRTC event
 *
 * ## Messaging Errors
 *
 * Delivery failures on the messaging path:
 * - A message with no resolvable recipients
 * - A bridge publish that failed after retries
 *
 * No error here is fatal: a single connection's bad event never tears down
 * the relay process.
 */
use thiserror::Error;

/// Relay-specific error types
///
/// Each variant that reaches a client does so through `client_message()`,
/// which yields the exact wire string the deployed clients match on.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The call target has no live connection.
    #[error("call target is offline")]
    OfflineRecipient,

    /// The initiator is not a member of the conversation room it named.
    #[error("initiator is not in the conversation room")]
    NotInConversation,

    /// A call is already active for this conversation.
    #[error("a call is already in progress for this conversation")]
    CallInProgress,

    /// Accept/reject arrived with no matching ringing session.
    #[error("no ringing call session for this user")]
    NoIncomingCall,

    /// A WebRTC signal arrived outside an accepted call session.
    #[error("no accepted call session between these peers")]
    NoActiveCall,

    /// A message resolved to zero recipients.
    #[error("message has no recipients")]
    EmptyRecipients,

    /// The pub/sub bridge refused or dropped a publish.
    #[error("bridge publish failed: {reason}")]
    BridgeUnavailable {
        /// What the bridge reported
        reason: String,
    },

    /// An inbound frame was not a valid client event.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        /// Human-readable error message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RelayError {
    /// Create a bridge-unavailable error
    pub fn bridge(reason: impl Into<String>) -> Self {
        Self::BridgeUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a malformed-payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// The string sent to the client for this error.
    ///
    /// "User offline" and "Not in same conversation" are load-bearing:
    /// deployed clients match on them verbatim.
    pub fn client_message(&self) -> String {
        match self {
            Self::OfflineRecipient => "User offline".to_string(),
            Self::NotInConversation => "Not in same conversation".to_string(),
            Self::CallInProgress => "Call already in progress".to_string(),
            Self::NoIncomingCall => "No incoming call".to_string(),
            Self::NoActiveCall => "No active call".to_string(),
            Self::EmptyRecipients => "Message has no recipients".to_string(),
            Self::BridgeUnavailable { .. } => "Delivery failed".to_string(),
            Self::MalformedPayload { .. } => "Malformed payload".to_string(),
            Self::SerializationError(_) => "Malformed payload".to_string(),
        }
    }
}
