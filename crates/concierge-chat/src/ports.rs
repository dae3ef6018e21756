//! Interfaces to the collaborators the chat consumes.
//!
//! The session manager never talks to a network directly; hosts plug in
//! implementations of these traits (HTTP adapters in production, fakes in
//! tests).

use std::sync::RwLock;

use async_trait::async_trait;
use concierge_core::{Identity, ProfileRecord};

use crate::email::EmailDraft;
use crate::error::ChatError;

/// Reads the account fields of a user's profile.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Returns `Ok(None)` when no profile exists for the identity.
    async fn lookup(&self, identity: &Identity) -> Result<Option<ProfileRecord>, ChatError>;
}

/// Generates a free-text answer when no canned rule matches.
#[async_trait]
pub trait FreeTextResponder: Send + Sync {
    async fn respond(&self, utterance: &str) -> Result<String, ChatError>;
}

/// Supplies the caller's identity, if authenticated.
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> Option<Identity>;
}

/// Hands a pre-filled support email to the user's mail client.
pub trait EmailHandoff: Send + Sync {
    fn compose(&self, draft: &EmailDraft) -> Result<(), ChatError>;
}

// =============================================================================
// SharedIdentity
// =============================================================================

/// Identity slot the host updates as the user signs in and out.
#[derive(Debug, Default)]
pub struct SharedIdentity {
    current: RwLock<Option<Identity>>,
}

impl SharedIdentity {
    /// An empty (signed-out) slot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            current: RwLock::new(Some(identity)),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        self.set(Some(identity));
    }

    pub fn sign_out(&self) {
        self.set(None);
    }

    /// Replace the current identity.
    pub fn set(&self, identity: Option<Identity>) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = identity;
    }
}

impl IdentityProvider for SharedIdentity {
    fn current(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// LoggingHandoff
// =============================================================================

/// Handoff for hosts that open the mail client themselves: it only logs the
/// `mailto:` link, which the host reads back from the manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandoff;

impl EmailHandoff for LoggingHandoff {
    fn compose(&self, draft: &EmailDraft) -> Result<(), ChatError> {
        tracing::info!(to = %draft.to, "Support email prepared");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
