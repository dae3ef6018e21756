//! Session state: visibility, transcript, and the `ended` overlay.
//!
//! Pure state transitions with no I/O and no timers. The
//! [`SessionManager`](crate::manager::SessionManager) drives these and
//! schedules the watchdog around them.
//!
//! Visibility:
//! - Closed -> Open (open)
//! - Open <-> Minimized (minimize / restore)
//! - Open | Minimized -> Closed (close)
//!
//! `ended` is orthogonal to visibility and is only cleared by closing an
//! ended session.

use concierge_core::{Message, Visibility};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Read-only view of a session handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub visibility: Visibility,
    pub transcript: Vec<Message>,
    pub ended: bool,
    pub is_loading: bool,
    pub pending_input: String,
}

/// Conversation state for one chat widget.
#[derive(Debug, Clone, Default)]
pub struct Session {
    visibility: Visibility,
    transcript: Vec<Message>,
    ended: bool,
    pending_input: String,
    busy: bool,
    epoch: u64,
}

impl Session {
    /// Create a closed, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Whether a reply is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Incremented each time an ended session is reset. A reply started in
    /// an earlier epoch belongs to a conversation that no longer exists.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Open the widget. Enqueues `welcome` as bot messages when the
    /// transcript is empty.
    ///
    /// Returns `false` if the widget was not closed.
    pub fn open(&mut self, welcome: &[&str]) -> bool {
        if !self.transition(Visibility::Open, Visibility::Closed) {
            return false;
        }
        if self.transcript.is_empty() {
            for line in welcome {
                self.transcript.push(Message::bot(*line, Vec::new()));
            }
        }
        true
    }

    pub fn minimize(&mut self) -> bool {
        self.transition(Visibility::Minimized, Visibility::Open)
    }

    pub fn restore(&mut self) -> bool {
        self.transition(Visibility::Open, Visibility::Minimized)
    }

    /// Hide the widget. An ended session is reset on the way out so the next
    /// open starts fresh; otherwise everything is kept.
    pub fn close(&mut self) -> bool {
        if !self.visibility.can_transition_to(&Visibility::Closed) {
            tracing::debug!("Ignoring close while {}", self.visibility);
            return false;
        }
        if self.ended {
            self.transcript.clear();
            self.pending_input.clear();
            self.ended = false;
            self.busy = false;
            self.epoch += 1;
            tracing::debug!(epoch = self.epoch, "Ended session reset on close");
        }
        tracing::debug!("Chat visibility: {} -> {}", self.visibility, Visibility::Closed);
        self.visibility = Visibility::Closed;
        true
    }

    /// Update the uncommitted input field text.
    ///
    /// Returns `false` without storing anything once ended.
    pub fn set_pending_input(&mut self, text: &str) -> bool {
        if self.ended {
            return false;
        }
        self.pending_input = text.to_string();
        true
    }

    /// Append a user message.
    ///
    /// Rejected without any state change when the session ended, a reply is
    /// in flight, or the trimmed text is empty.
    pub fn append_user(&mut self, text: &str) -> Result<&Message, ChatError> {
        if self.ended {
            return Err(ChatError::SessionEnded);
        }
        if self.busy {
            return Err(ChatError::Busy);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.pending_input.clear();
        Ok(self.push(Message::user(trimmed)))
    }

    /// Append a bot message. Always permitted.
    pub fn append_bot(&mut self, text: impl Into<String>, options: Vec<String>) -> &Message {
        self.push(Message::bot(text, options))
    }

    /// Mark a reply as in flight.
    pub fn begin_reply(&mut self) {
        self.busy = true;
    }

    pub fn finish_reply(&mut self) {
        self.busy = false;
    }

    /// Send the farewell and mark the session ended.
    ///
    /// Returns `false` without appending anything if already ended.
    pub fn end(&mut self, farewell: &str) -> bool {
        if self.ended {
            return false;
        }
        self.push(Message::bot(farewell, Vec::new()));
        self.ended = true;
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            visibility: self.visibility,
            transcript: self.transcript.clone(),
            ended: self.ended,
            is_loading: self.busy,
            pending_input: self.pending_input.clone(),
        }
    }

    // -- Private helpers --

    fn push(&mut self, message: Message) -> &Message {
        self.transcript.push(message);
        &self.transcript[self.transcript.len() - 1]
    }

    /// Move to `target` if currently in `from`.
    fn transition(&mut self, target: Visibility, from: Visibility) -> bool {
        if self.visibility != from || !self.visibility.can_transition_to(&target) {
            tracing::debug!("Ignoring transition {} -> {}", self.visibility, target);
            return false;
        }
        tracing::debug!("Chat visibility: {} -> {}", self.visibility, target);
        self.visibility = target;
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
