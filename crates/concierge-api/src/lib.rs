//! Concierge API crate - axum HTTP surface for support-chat sessions.
//!
//! Each chat widget instance maps to one server-side session. The host
//! drives it with visibility events, typed messages, option and quick
//! action clicks, and reads back the transcript snapshot.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod reaper;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use reaper::spawn_session_reaper;
pub use routes::{create_router, start_server};
pub use state::{AppState, Backends};
