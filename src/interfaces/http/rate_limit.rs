//! Per-(subject, action) rate limiting of write requests
//!
//! The subject is the authenticated user when the auth middleware ran
//! first, otherwise the client address. Safe methods pass through
//! untouched.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::application::ports::{RateLimitDecision, RateLimiter};
use crate::domain::DomainError;
use crate::interfaces::http::common::domain_error;
use crate::interfaces::http::middleware::AuthenticatedUser;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiter>,
    /// Action label, e.g. `meals`
    pub action: &'static str,
}

impl RateLimitState {
    pub fn new(limiter: Arc<dyn RateLimiter>, action: &'static str) -> Self {
        Self { limiter, action }
    }
}

fn is_write(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn subject_of(request: &Request<Body>) -> String {
    if let Some(user) = request.extensions().get::<AuthenticatedUser>() {
        return format!("user:{}", user.user_id);
    }
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    match forwarded {
        Some(ip) => format!("ip:{}", ip),
        None => "ip:unknown".to_string(),
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let reset_secs = decision.reset_after.as_secs_f64().ceil() as u64;
    for (name, value) in [
        (LIMIT_HEADER, decision.limit as u64),
        (REMAINING_HEADER, decision.remaining as u64),
        (RESET_HEADER, reset_secs),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !is_write(request.method()) {
        return next.run(request).await;
    }

    let key = format!("{}:{}", subject_of(&request), state.action);
    let decision = state.limiter.check(&key);

    if !decision.allowed {
        let retry_after = decision.reset_after.as_secs_f64().ceil().max(1.0) as u64;
        metrics::counter!("rate_limit_rejections_total", "action" => state.action).increment(1);
        warn!(key = %key, retry_after, "Rate limit exceeded");

        let mut response = domain_error(DomainError::RateLimited {
            retry_after_secs: retry_after,
        })
        .into_response();
        apply_headers(response.headers_mut(), &decision);
        response.headers_mut().insert(
            axum::http::header::RETRY_AFTER,
            HeaderValue::from(retry_after),
        );
        return response;
    }

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), &decision);
    response
}
