//! Error types for the support-chat engine.

use concierge_core::error::ConciergeError;

/// Errors from the chat engine.
///
/// None of these reach the host as failures: input rejections are absorbed
/// and collaborator failures become canned bot replies.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a reply is already in flight")]
    Busy,
    #[error("session has ended")]
    SessionEnded,
    #[error("unknown quick action: {0}")]
    UnknownQuickAction(String),
    #[error("profile lookup error: {0}")]
    LookupError(String),
    #[error("responder error: {0}")]
    ResponderError(String),
    #[error("email handoff error: {0}")]
    HandoffError(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ConciergeError> for ChatError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::ProfileLookup(msg) => ChatError::LookupError(msg),
            ConciergeError::Responder(msg) => ChatError::ResponderError(msg),
            ConciergeError::EmailHandoff(msg) => ChatError::HandoffError(msg),
            other => ChatError::Internal(other.to_string()),
        }
    }
}
