//! Per-IP rate limiting for the login route
//!
//! Throttles a source address, never an account: there is no lockout.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::ServerState;
use crate::security_log;

/// Entries idle longer than this are dropped by [`RateLimiter::cleanup`]
const IDLE_CUTOFF: Duration = Duration::from_secs(300);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window: Duration,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= max_requests
    }

    /// Remove idle entries; returns how many were dropped
    pub async fn cleanup(&self) -> usize {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        let mut removed = 0;

        for route_map in map.values_mut() {
            let before = route_map.len();
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < IDLE_CUTOFF);
            removed += before - route_map.len();
        }

        map.retain(|_, route_map| !route_map.is_empty());
        removed
    }
}

/// Client IP: the peer address, or the first `X-Forwarded-For` hop when the
/// server runs behind a proxy that sets it.
fn extract_ip(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Login throttle: `LOGIN_RATE_LIMIT` requests per window per IP
pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.config.trust_forwarded_for);
    let limits = &state.config.login_rate;
    if !state
        .rate_limiter
        .check("login", &ip, limits.max_requests, limits.window)
        .await
    {
        security_log!("WARN", "rate_limited", route = "login", ip = ip);
        return Err(AppError::too_many_requests());
    }
    Ok(next.run(request).await)
}
