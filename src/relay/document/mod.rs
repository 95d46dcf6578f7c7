//! Document Collaboration Relay
//!
//! Live edit fan-out for collaborative documents: viewers join a
//! per-document room and edits are rebroadcast to everyone else in it.
//! Unlike messaging, this is process-local room traffic; persistence and
//! merge live in the document service the client talks to separately.

/// Document event handlers
pub mod handlers;

pub use handlers::document_room;
