//! Fixed-window rate limiter middleware.
//!
//! Counts requests per wall-clock second with atomics and rejects the
//! overflow with 429.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Requests allowed per second on the chat routes.
pub const DEFAULT_MAX_PER_SEC: u64 = 100;

/// Shared state for the rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    max_per_sec: u64,
    /// Requests seen in the current window.
    count: Arc<AtomicU64>,
    /// Epoch second of the current window.
    window: Arc<AtomicU64>,
}

impl RateLimiter {
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec,
            count: Arc::new(AtomicU64::new(0)),
            window: Arc::new(AtomicU64::new(0)),
        }
    }

    fn try_acquire(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.try_acquire_at(now)
    }

    fn try_acquire_at(&self, now: u64) -> bool {
        if self.window.swap(now, Ordering::Relaxed) != now {
            self.count.store(1, Ordering::Relaxed);
            return self.max_per_sec > 0;
        }
        self.count.fetch_add(1, Ordering::Relaxed) < self.max_per_sec
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_SEC)
    }
}

/// Axum middleware that enforces the rate limit.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(req).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "too_many_requests",
                "message": "Rate limit exceeded"
            })),
        )
            .into_response()
    }
}
