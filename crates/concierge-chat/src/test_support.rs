//! Deterministic collaborator fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use concierge_core::{Identity, ProfileRecord, VerificationFlag};
use tokio::sync::Notify;

use crate::email::EmailDraft;
use crate::error::ChatError;
use crate::ports::{EmailHandoff, FreeTextResponder, ProfileLookup};

enum ProfileBehavior {
    Found(ProfileRecord),
    Missing,
    Fail,
}

pub struct FakeProfiles {
    behavior: ProfileBehavior,
    calls: AtomicUsize,
}

impl FakeProfiles {
    fn with(behavior: ProfileBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn found(record: ProfileRecord) -> Self {
        Self::with(ProfileBehavior::Found(record))
    }

    pub fn verified(flag: VerificationFlag) -> Self {
        Self::found(ProfileRecord {
            is_verified: flag,
            credit_limit: 1000.0,
            credited_amount: 250.0,
        })
    }

    pub fn missing() -> Self {
        Self::with(ProfileBehavior::Missing)
    }

    pub fn failing() -> Self {
        Self::with(ProfileBehavior::Fail)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileLookup for FakeProfiles {
    async fn lookup(&self, _identity: &Identity) -> Result<Option<ProfileRecord>, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ProfileBehavior::Found(record) => Ok(Some(record.clone())),
            ProfileBehavior::Missing => Ok(None),
            ProfileBehavior::Fail => Err(ChatError::LookupError("service unavailable".into())),
        }
    }
}

enum ResponderBehavior {
    Reply(String),
    Fail,
    Panic,
    /// Waits for the gate before replying.
    Gated(Arc<Notify>, String),
}

pub struct FakeResponder {
    behavior: ResponderBehavior,
    calls: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl FakeResponder {
    fn with(behavior: ResponderBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(ResponderBehavior::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(ResponderBehavior::Fail)
    }

    pub fn panicking() -> Self {
        Self::with(ResponderBehavior::Panic)
    }

    pub fn gated(gate: Arc<Notify>, text: &str) -> Self {
        Self::with(ResponderBehavior::Gated(gate, text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_utterance(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl FreeTextResponder for FakeResponder {
    async fn respond(&self, utterance: &str) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(utterance.to_string());
        match &self.behavior {
            ResponderBehavior::Reply(text) => Ok(text.clone()),
            ResponderBehavior::Fail => Err(ChatError::ResponderError("status 500".into())),
            ResponderBehavior::Panic => panic!("responder blew up"),
            ResponderBehavior::Gated(gate, text) => {
                gate.notified().await;
                Ok(text.clone())
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingHandoff {
    pub fail: bool,
    pub drafts: Mutex<Vec<EmailDraft>>,
}

impl EmailHandoff for RecordingHandoff {
    fn compose(&self, draft: &EmailDraft) -> Result<(), ChatError> {
        if self.fail {
            return Err(ChatError::HandoffError("no mail client".into()));
        }
        self.drafts.lock().unwrap().push(draft.clone());
        Ok(())
    }
}
