//! Messaging Relay
//!
//! Live delivery of chat messages and reactions. Client-originated events
//! are published to the pub/sub bridge (`handlers`); frames coming back off
//! the bridge are fanned out to sockets (`delivery`). The split matters:
//! delivery runs identically whether the frame was published by this
//! process or by another relay instance.

/// Client-originated event handlers
pub mod handlers;

/// Bridge-receipt fan-out
pub mod delivery;
