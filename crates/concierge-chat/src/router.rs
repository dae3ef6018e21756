//! Intent router: maps one user utterance to exactly one bot reply.
//!
//! Utterances are lowercased and trimmed, then matched by substring
//! containment against an ordered rule table. The first rule whose trigger
//! appears in the text wins; when none match, the raw utterance goes to the
//! free-text responder. Collaborator failures always resolve to a canned
//! reply, never to an error.

use std::fmt;
use std::sync::Arc;

use concierge_core::{Identity, ProfileRecord, VerificationFlag};

use crate::error::ChatError;
use crate::ports::{FreeTextResponder, ProfileLookup};
use crate::replies::{self, Reply};

// =============================================================================
// Intent
// =============================================================================

/// The rule an utterance matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MainMenu,
    ContactSupport,
    ReportIssue,
    AccountStatus,
    CreditSpend,
    Help,
    /// No rule matched; the free-text responder answers.
    FreeText,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::MainMenu => "main_menu",
            Intent::ContactSupport => "contact_support",
            Intent::ReportIssue => "report_issue",
            Intent::AccountStatus => "account_status",
            Intent::CreditSpend => "credit_spend",
            Intent::Help => "help",
            Intent::FreeText => "free_text",
        };
        f.write_str(name)
    }
}

/// Rules in priority order; earlier entries shadow later ones.
static RULES: &[(Intent, &[&str])] = &[
    (Intent::MainMenu, &["back to main", "main menu"]),
    (Intent::ContactSupport, &["contact support"]),
    (Intent::ReportIssue, &["report an issue"]),
    (Intent::AccountStatus, &["verification", "status"]),
    (Intent::CreditSpend, &["credit spend", "spend"]),
    (Intent::Help, &["help", "support"]),
];

/// Lowercase and trim an utterance for matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

// =============================================================================
// IntentRouter
// =============================================================================

/// Ordered rule matcher backed by the profile and free-text collaborators.
///
/// Never touches session state; the caller appends the returned reply.
#[derive(Clone)]
pub struct IntentRouter {
    profiles: Arc<dyn ProfileLookup>,
    responder: Arc<dyn FreeTextResponder>,
    support_email: String,
}

impl IntentRouter {
    pub fn new(
        profiles: Arc<dyn ProfileLookup>,
        responder: Arc<dyn FreeTextResponder>,
        support_email: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            responder,
            support_email: support_email.into(),
        }
    }

    /// Match an utterance against the rule table without any I/O.
    pub fn classify(text: &str) -> Intent {
        let normalized = normalize(text);
        RULES
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| normalized.contains(t)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::FreeText)
    }

    /// Produce the reply for one utterance.
    pub async fn route(&self, utterance: &str, identity: Option<&Identity>) -> Reply {
        let intent = Self::classify(utterance);
        tracing::debug!(%intent, "Routing chat message");

        match intent {
            Intent::MainMenu => Reply::text(replies::MAIN_MENU),
            Intent::ContactSupport => replies::contact_support(&self.support_email),
            Intent::ReportIssue => Reply::text(replies::REPORT_ISSUE),
            Intent::AccountStatus => match identity {
                None => Reply::text(replies::LOGIN_REQUIRED),
                Some(identity) => self.account_status(identity).await,
            },
            Intent::CreditSpend => match identity {
                None => Reply::text(replies::LOGIN_REQUIRED),
                Some(identity) => self.credit_spend(identity).await,
            },
            Intent::Help => replies::help(),
            Intent::FreeText => self.free_text(utterance).await,
        }
    }

    // -- Private helpers --

    async fn account_status(&self, identity: &Identity) -> Reply {
        match self.lookup(identity).await {
            Ok(None) => Reply::text(replies::SETUP_INCOMPLETE),
            Ok(Some(profile)) => Reply::text(match profile.is_verified {
                VerificationFlag::Verified => replies::VERIFIED,
                VerificationFlag::Pending => replies::PENDING,
                VerificationFlag::Unset => replies::UNVERIFIED,
            }),
            Err(_) => Reply::text(replies::UNABLE_TO_CHECK),
        }
    }

    async fn credit_spend(&self, identity: &Identity) -> Reply {
        match self.lookup(identity).await {
            Ok(None) => Reply::text(replies::SETUP_INCOMPLETE),
            Ok(Some(profile)) => replies::credit_summary(&profile),
            Err(_) => Reply::text(replies::UNABLE_TO_CHECK),
        }
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<ProfileRecord>, ChatError> {
        self.profiles.lookup(identity).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Profile lookup failed");
        })
    }

    async fn free_text(&self, utterance: &str) -> Reply {
        match self.responder.respond(utterance).await {
            Ok(text) => Reply::text(text),
            Err(e) => {
                tracing::warn!(error = %e, "Free-text responder failed");
                replies::not_sure()
            }
        }
    }
}

impl fmt::Debug for IntentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRouter")
            .field("support_email", &self.support_email)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
