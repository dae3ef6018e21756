//! Route handler functions for the chat endpoints.
//!
//! Session handlers sync the caller identity from the `x-user-id` header,
//! apply one widget event, and answer with the resulting transcript
//! snapshot.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use concierge_chat::SessionSnapshot;
use concierge_core::{Identity, QuickAction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, ChatSession};

/// Header carrying the authenticated caller, set by the upstream gateway.
///
/// A non-blank value signs the session in as that user. A present but blank
/// value signs it out. Requests without the header leave the session's
/// identity as it was.
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub session: SessionSnapshot,
}

/// Result of one widget event. Ignored input is `accepted: false`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub accepted: bool,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupportEmailResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickActionsResponse {
    pub actions: Vec<QuickAction>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Look up a session and sync its identity from the request headers.
fn session_for(state: &AppState, id: Uuid, headers: &HeaderMap) -> Result<ChatSession, ApiError> {
    let identity = identity_from(headers)?;
    let session = state.session(id)?;
    if let Some(identity) = identity {
        session.identity.set(identity);
    }
    Ok(session)
}

/// `None` when the header is absent; `Some(None)` for an explicit sign-out.
fn identity_from(headers: &HeaderMap) -> Result<Option<Option<Identity>>, ApiError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} header encoding", USER_ID_HEADER)))?
        .trim();
    Ok(Some((!value.is_empty()).then(|| Identity::new(value))))
}

fn event(session: &ChatSession, accepted: bool) -> Json<EventResponse> {
    Json(EventResponse {
        accepted,
        session: session.manager.snapshot(),
    })
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and basic counters. Unauthenticated.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.session_count() as u64,
    })
}

/// GET /chat/quick-actions - the configured quick action catalog.
pub async fn quick_actions(State(state): State<AppState>) -> Json<QuickActionsResponse> {
    Json(QuickActionsResponse {
        actions: state.config.chat.quick_actions.clone(),
    })
}

/// POST /chat/sessions - create a closed session.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let identity = identity_from(&headers)?.flatten();
    let (id, session) = state.create_session();
    session.identity.set(identity);
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            id,
            session: session.manager.snapshot(),
        }),
    ))
}

/// GET /chat/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(id)?;
    Ok(Json(SessionResponse {
        id,
        session: session.manager.snapshot(),
    }))
}

/// DELETE /chat/sessions/{id} - tear down the session and its watchdog.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /chat/sessions/{id}/open
pub async fn open(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.open();
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/close
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.close();
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/minimize
pub async fn minimize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.minimize();
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.restore();
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/end - manual "End Chat".
pub async fn end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.end_chat();
    Ok(event(&session, accepted))
}

/// PUT /chat/sessions/{id}/input - update the uncommitted input text.
pub async fn set_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TextRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.set_pending_input(&body.text);
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/messages - send typed input and wait for the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TextRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.send_message(&body.text).await;
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/options - click a quick-reply option.
pub async fn click_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<TextRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.click_option(&body.text).await;
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/quick-actions/{action_id}
pub async fn click_quick_action(
    State(state): State<AppState>,
    Path((id, action_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let accepted = session.manager.click_quick_action(&action_id).await;
    Ok(event(&session, accepted))
}

/// POST /chat/sessions/{id}/support-email - hand off the support template.
pub async fn support_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<SupportEmailResponse>, ApiError> {
    let session = session_for(&state, id, &headers)?;
    let mailto = session.manager.compose_support_email();
    Ok(Json(SupportEmailResponse {
        accepted: mailto.is_some(),
        mailto,
    }))
}
