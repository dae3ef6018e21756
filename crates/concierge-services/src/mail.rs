//! Mail client handoff through the OS URL handler.

use concierge_chat::{ChatError, EmailDraft, EmailHandoff};
use tracing::info;

/// Opens the draft's `mailto:` link with the system default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct MailClientHandoff;

impl EmailHandoff for MailClientHandoff {
    fn compose(&self, draft: &EmailDraft) -> Result<(), ChatError> {
        let url = draft.mailto_url();
        open::that(&url).map_err(|e| ChatError::HandoffError(e.to_string()))?;
        info!(to = %draft.to, "Opened mail client for support email");
        Ok(())
    }
}
