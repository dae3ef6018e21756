//! Background eviction of dormant chat sessions.
//!
//! Hosts rarely delete their sessions, so the registry is swept on a fixed
//! interval. A session is evicted once it is no longer open and active and
//! no request has touched it for `chat.idle_timeout_secs`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;

/// How often the registry is swept.
pub const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the sweep loop. Runs until the returned handle is aborted or the
/// runtime shuts down.
pub fn spawn_session_reaper(state: AppState) -> JoinHandle<()> {
    let max_idle = Duration::from_secs(state.config.chat.idle_timeout_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REAP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let reaped = state.reap_idle_sessions(max_idle);
            if reaped > 0 {
                tracing::info!(
                    reaped,
                    remaining = state.session_count(),
                    "Reaped idle chat sessions"
                );
            }
        }
    })
}
