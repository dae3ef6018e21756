//! Production adapters for the chat collaborator ports.
//!
//! - [`HttpProfileLookup`]: reads account fields from the profile service.
//! - [`HttpFreeTextResponder`]: asks the generative backend for an answer.
//! - [`MailClientHandoff`]: opens the OS mail client on a `mailto:` link.

mod http;
pub mod mail;
pub mod profile;
pub mod responder;

pub use mail::MailClientHandoff;
pub use profile::HttpProfileLookup;
pub use responder::HttpFreeTextResponder;
