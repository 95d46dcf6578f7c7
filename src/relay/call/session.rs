/**
 * Call Session Registry
 *
 * Explicit finite-state records for call attempts, keyed by conversation
 * id. A session is created when a call starts ringing, transitions to
 * accepted, and is removed on reject, end, or disconnect of either party.
 * Out-of-order transitions are rejected with an error instead of being
 * forwarded blindly, which is also what gates WebRTC signaling: offers,
 * answers, and ICE candidates only relay inside an accepted session
 * between the two participants.
 *
 * # Lifetime
 *
 * Sessions live only in this process's memory. There is no ring timeout: a
 * caller can ring until the callee answers, rejects, or one side
 * disconnects.
 */
use crate::relay::error::RelayError;
use crate::shared::{ConversationId, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Phase of an active call attempt. Terminal outcomes (rejected, ended)
/// have no variant: the session record is removed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Ringing,
    Accepted,
}

/// One active call attempt.
#[derive(Debug, Clone)]
pub struct CallSession {
    pub caller: UserId,
    pub callee: UserId,
    pub conversation_id: ConversationId,
    pub state: CallState,
    pub started_at: DateTime<Utc>,
}

impl CallSession {
    fn involves(&self, user_id: UserId) -> bool {
        self.caller == user_id || self.callee == user_id
    }

    /// The other participant, from `user_id`'s point of view.
    pub fn peer_of(&self, user_id: UserId) -> UserId {
        if self.caller == user_id {
            self.callee
        } else {
            self.caller
        }
    }
}

/// Per-process registry of active call sessions, keyed by conversation id.
#[derive(Debug, Default)]
pub struct CallRegistry {
    sessions: Mutex<HashMap<String, CallSession>>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ringing: create a session for the conversation.
    pub fn ring(
        &self,
        conversation_id: &ConversationId,
        caller: UserId,
        callee: UserId,
    ) -> Result<(), RelayError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(conversation_id.as_str()) {
            return Err(RelayError::CallInProgress);
        }
        sessions.insert(
            conversation_id.as_str().to_string(),
            CallSession {
                caller,
                callee,
                conversation_id: conversation_id.clone(),
                state: CallState::Ringing,
                started_at: Utc::now(),
            },
        );
        tracing::info!(
            "[Call] {} ringing {} in conversation {}",
            caller,
            callee,
            conversation_id
        );
        Ok(())
    }

    /// Accept a ringing call. The acting user must be the callee of a
    /// ringing session, located by conversation id when the client sent
    /// one, otherwise by scanning for the user's ringing session.
    ///
    /// Returns the caller id, i.e. who to notify.
    pub fn accept(
        &self,
        conversation_id: Option<&ConversationId>,
        callee: UserId,
    ) -> Result<UserId, RelayError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = Self::ringing_for(&mut sessions, conversation_id, callee)?;
        session.state = CallState::Accepted;
        tracing::info!(
            "[Call] {} accepted call from {} in conversation {}",
            callee,
            session.caller,
            session.conversation_id
        );
        Ok(session.caller)
    }

    /// Reject a ringing call; the session is removed. Same lookup rules as
    /// `accept`. Returns the caller id.
    pub fn reject(
        &self,
        conversation_id: Option<&ConversationId>,
        callee: UserId,
    ) -> Result<UserId, RelayError> {
        let mut sessions = self.sessions.lock().unwrap();
        let key = Self::ringing_for(&mut sessions, conversation_id, callee)?
            .conversation_id
            .as_str()
            .to_string();
        let Some(session) = sessions.remove(&key) else {
            return Err(RelayError::NoIncomingCall);
        };
        tracing::info!(
            "[Call] {} rejected call from {} in conversation {}",
            callee,
            session.caller,
            key
        );
        Ok(session.caller)
    }

    /// Whether an accepted session exists for this conversation with
    /// exactly these two participants. Gates WebRTC signal relay.
    pub fn is_accepted_between(
        &self,
        conversation_id: &ConversationId,
        one: UserId,
        other: UserId,
    ) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .get(conversation_id.as_str())
            .is_some_and(|session| {
                session.state == CallState::Accepted
                    && session.involves(one)
                    && session.involves(other)
                    && one != other
            })
    }

    /// Dispose the conversation's session, if any. `call-end` is
    /// unconditional: a missing session is not an error.
    pub fn end(&self, conversation_id: &ConversationId) -> Option<CallSession> {
        let removed = self
            .sessions
            .lock()
            .unwrap()
            .remove(conversation_id.as_str());
        if let Some(session) = &removed {
            tracing::info!(
                "[Call] Conversation {} call over after {}s",
                conversation_id,
                (Utc::now() - session.started_at).num_seconds()
            );
        }
        removed
    }

    /// Dispose every session involving `user_id` (disconnect teardown).
    /// Returns the removed sessions so the caller can notify the peers.
    pub fn end_for_user(&self, user_id: UserId) -> Vec<CallSession> {
        let mut sessions = self.sessions.lock().unwrap();
        let keys: Vec<String> = sessions
            .iter()
            .filter(|(_, session)| session.involves(user_id))
            .map(|(key, _)| key.clone())
            .collect();
        keys.iter()
            .filter_map(|key| sessions.remove(key))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    fn ringing_for<'a>(
        sessions: &'a mut HashMap<String, CallSession>,
        conversation_id: Option<&ConversationId>,
        callee: UserId,
    ) -> Result<&'a mut CallSession, RelayError> {
        let key = match conversation_id {
            Some(id) => id.as_str().to_string(),
            None => sessions
                .iter()
                .find(|(_, s)| s.state == CallState::Ringing && s.callee == callee)
                .map(|(key, _)| key.clone())
                .ok_or(RelayError::NoIncomingCall)?,
        };
        match sessions.get_mut(&key) {
            Some(session) if session.state == CallState::Ringing && session.callee == callee => {
                Ok(session)
            }
            _ => Err(RelayError::NoIncomingCall),
        }
    }
}
