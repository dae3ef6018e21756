//! Support-chat session manager.
//!
//! Owns the chat transcript, the open/minimized/closed visibility state, the
//! inactivity watchdog, and the ordered intent rules that turn a user
//! utterance into a bot reply. External services are reached only through
//! the traits in [`ports`].

pub mod email;
pub mod error;
pub mod manager;
pub mod ports;
pub mod quick_action;
pub mod replies;
pub mod router;
pub mod session;
pub mod watchdog;

#[cfg(test)]
mod test_support;

pub use email::EmailDraft;
pub use error::ChatError;
pub use manager::{SessionManager, SessionServices};
pub use ports::{
    EmailHandoff, FreeTextResponder, IdentityProvider, LoggingHandoff, ProfileLookup,
    SharedIdentity,
};
pub use quick_action::{Dispatch, QuickActionCatalog};
pub use replies::Reply;
pub use router::{Intent, IntentRouter};
pub use session::{Session, SessionSnapshot};
pub use watchdog::InactivityWatchdog;
