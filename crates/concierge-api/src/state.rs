//! Application state shared across all route handlers.
//!
//! Holds the collaborator backends every session is wired to and the
//! registry of live sessions, keyed by id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use concierge_chat::{
    EmailHandoff, FreeTextResponder, ProfileLookup, SessionManager, SessionServices,
    SharedIdentity,
};
use concierge_core::ConciergeConfig;
use uuid::Uuid;

use crate::auth::generate_token;
use crate::error::ApiError;

/// Collaborators shared by all sessions. Identity is per session.
#[derive(Clone)]
pub struct Backends {
    pub profiles: Arc<dyn ProfileLookup>,
    pub responder: Arc<dyn FreeTextResponder>,
    pub email: Arc<dyn EmailHandoff>,
}

/// One live chat session and the identity slot the API writes into.
#[derive(Clone)]
pub struct ChatSession {
    pub manager: Arc<SessionManager>,
    pub identity: Arc<SharedIdentity>,
    last_seen: Arc<Mutex<tokio::time::Instant>>,
}

impl ChatSession {
    fn touch(&self) {
        let mut last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        *last_seen = tokio::time::Instant::now();
    }

    /// Time since the last request addressed this session.
    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Not open and active, and untouched for at least `max_idle`.
    ///
    /// Open sessions are left to their watchdog, which ends them first.
    fn is_dormant(&self, max_idle: Duration) -> bool {
        !self.manager.is_active() && self.idle_for() >= max_idle
    }
}

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<ConciergeConfig>,
    /// Collaborators new sessions are wired to.
    pub backends: Backends,
    /// Live sessions by id.
    pub sessions: Arc<RwLock<HashMap<Uuid, ChatSession>>>,
    /// Bearer token required on protected routes.
    pub api_token: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create state with a freshly generated API token.
    pub fn new(config: ConciergeConfig, backends: Backends) -> Self {
        Self {
            config: Arc::new(config),
            backends,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            api_token: generate_token(),
            start_time: Instant::now(),
        }
    }

    /// Register a new closed session.
    pub fn create_session(&self) -> (Uuid, ChatSession) {
        let identity = Arc::new(SharedIdentity::new());
        let services = SessionServices {
            profiles: Arc::clone(&self.backends.profiles),
            responder: Arc::clone(&self.backends.responder),
            identity: identity.clone(),
            email: Arc::clone(&self.backends.email),
        };
        let session = ChatSession {
            manager: Arc::new(SessionManager::new(&self.config, services)),
            identity,
            last_seen: Arc::new(Mutex::new(tokio::time::Instant::now())),
        };

        let id = Uuid::new_v4();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session.clone());
        tracing::debug!(%id, "Chat session created");
        (id, session)
    }

    /// Look up a session and mark it as recently used.
    pub fn session(&self, id: Uuid) -> Result<ChatSession, ApiError> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))?;
        session.touch();
        Ok(session)
    }

    /// Drop a session from the registry and cancel its watchdog.
    pub fn remove_session(&self, id: Uuid) -> Result<(), ApiError> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match removed {
            Some(session) => {
                session.manager.shutdown();
                tracing::debug!(%id, "Chat session removed");
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("Session {} not found", id))),
        }
    }

    /// Evict every dormant session and cancel its watchdog.
    ///
    /// Returns the number of sessions removed.
    pub fn reap_idle_sessions(&self, max_idle: Duration) -> usize {
        let mut reaped = Vec::new();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id, session| {
                if session.is_dormant(max_idle) {
                    reaped.push((*id, session.clone()));
                    false
                } else {
                    true
                }
            });

        for (id, session) in &reaped {
            session.manager.shutdown();
            tracing::debug!(%id, idle_secs = session.idle_for().as_secs(), "Chat session reaped");
        }
        reaped.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
