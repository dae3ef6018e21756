//! API authentication via bearer tokens.
//!
//! Provides token generation, persistence, and middleware for validating
//! `Authorization: Bearer <token>` headers on protected endpoints.

use std::path::Path;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;

use crate::state::AppState;

/// Generate a random 32-character hex token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

/// Load token from file, or generate and save a new one.
pub fn load_or_generate_token(token_path: &Path) -> String {
    if let Ok(contents) = std::fs::read_to_string(token_path) {
        let token = contents.trim().to_string();
        if !token.is_empty() {
            tracing::info!("API token loaded from {}", token_path.display());
            return token;
        }
    }

    let token = generate_token();

    if let Some(parent) = token_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(token_path, &token) {
        tracing::warn!(error = %e, "Failed to save API token to {}", token_path.display());
    } else {
        // Owner-only access.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(token_path, std::fs::Permissions::from_mode(0o600));
        }
        tracing::info!("API token saved to {}", token_path.display());
    }

    token
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Middleware that validates Bearer token authentication.
///
/// Returns 401 if the header is missing, malformed, or carries the wrong token.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(value) = req.headers().get("authorization") else {
        return unauthorized("Missing Authorization header");
    };
    let Ok(value) = value.to_str() else {
        return unauthorized("Invalid Authorization header encoding");
    };

    match value.strip_prefix("Bearer ") {
        Some(token) if token == state.api_token => next.run(req).await,
        _ => unauthorized("Invalid bearer token"),
    }
}
