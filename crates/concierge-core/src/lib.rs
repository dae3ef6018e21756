//! Shared domain types, configuration, and errors for the Concierge
//! support-chat component.

pub mod config;
pub mod error;
pub mod types;

pub use config::ConciergeConfig;
pub use error::{ConciergeError, Result};
pub use types::*;
