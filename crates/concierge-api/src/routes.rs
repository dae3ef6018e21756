//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use concierge_core::{ConciergeError, Result};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, USER_ID_HEADER};
use crate::rate_limit::RateLimiter;
use crate::reaper::spawn_session_reaper;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Localhost origins on the configured port and the dev server port above it.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| [format!("http://127.0.0.1:{}", p), format!("http://localhost:{}", p)])
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
        ]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let protected_routes = Router::new()
        .route("/chat/quick-actions", get(handlers::quick_actions))
        .route("/chat/sessions", post(handlers::create_session))
        .route(
            "/chat/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/chat/sessions/{id}/open", post(handlers::open))
        .route("/chat/sessions/{id}/close", post(handlers::close))
        .route("/chat/sessions/{id}/minimize", post(handlers::minimize))
        .route("/chat/sessions/{id}/restore", post(handlers::restore))
        .route("/chat/sessions/{id}/end", post(handlers::end))
        .route("/chat/sessions/{id}/input", put(handlers::set_input))
        .route("/chat/sessions/{id}/messages", post(handlers::send_message))
        .route("/chat/sessions/{id}/options", post(handlers::click_option))
        .route(
            "/chat/sessions/{id}/quick-actions/{action_id}",
            post(handlers::click_quick_action),
        )
        .route(
            "/chat/sessions/{id}/support-email",
            post(handlers::support_email),
        )
        .layer(axum::middleware::from_fn(
            crate::rate_limit::rate_limit_middleware,
        ))
        .layer(axum::Extension(RateLimiter::default()))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    public_routes
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on 127.0.0.1 at the configured port, along with
/// the idle session reaper.
pub async fn start_server(state: AppState) -> Result<()> {
    let addr = format!("127.0.0.1:{}", state.config.general.port);
    let router = create_router(state.clone());

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConciergeError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    let reaper = spawn_session_reaper(state);

    let served = axum::serve(listener, router)
        .await
        .map_err(|e| ConciergeError::Api(format!("Server error: {}", e)));
    reaper.abort();
    served
}
