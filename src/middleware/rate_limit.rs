//! Per-endpoint fixed-window rate limiting.
//!
//! Runs before identity resolution, so callers are keyed by forwarded-IP
//! headers or the peer address rather than identity. The counter store is
//! the gateway's only mutable shared state; check-and-increment happens
//! under one lock acquisition so a key's quota holds exactly under
//! concurrent requests. Expired windows are evicted once the store passes
//! a size threshold, keeping memory bounded even when callers rotate
//! spoofed forwarded-for values.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Store size at which expired windows are swept out.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct EndpointLimit {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
    window: Duration,
}

struct Inner {
    /// Registration table keyed by (method, path template).
    limits: HashMap<(Method, String), EndpointLimit>,
    default_limit: EndpointLimit,
    windows: Mutex<HashMap<(String, String), Window>>,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

impl RateLimiter {
    /// Builds the endpoint table from config. Write endpoints get a quarter
    /// of the read quota; unregistered endpoints fall back to the default.
    pub fn for_config(api: &ApiConfig) -> Self {
        let window = Duration::from_secs(api.rate_limit_window_secs);
        let reads = EndpointLimit {
            max_requests: api.rate_limit_requests,
            window,
        };
        let writes = EndpointLimit {
            max_requests: (api.rate_limit_requests / 4).max(1),
            window,
        };

        let mut limits = HashMap::new();
        limits.insert((Method::GET, "/api/v1/reminders".to_string()), reads);
        limits.insert((Method::POST, "/api/v1/reminders".to_string()), writes);
        limits.insert(
            (Method::GET, "/api/v1/billing/subscription".to_string()),
            reads,
        );

        Self {
            inner: Arc::new(Inner {
                limits,
                default_limit: reads,
                windows: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn limit_for(&self, method: &Method, path: &str) -> EndpointLimit {
        self.inner
            .limits
            .get(&(method.clone(), path.to_string()))
            .copied()
            .unwrap_or(self.inner.default_limit)
    }

    /// Atomically record a hit and decide whether it is within quota.
    pub fn check(&self, method: &Method, path: &str, caller_key: &str) -> bool {
        self.check_at(method, path, caller_key, Instant::now())
    }

    fn check_at(&self, method: &Method, path: &str, caller_key: &str, now: Instant) -> bool {
        let limit = self.limit_for(method, path);
        let key = (format!("{} {}", method, path), caller_key.to_string());

        let mut windows = self
            .inner
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Evict stale entries so keys seen once do not accumulate forever
        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < w.window);
        }

        let window = windows.entry(key).or_insert(Window {
            started: now,
            count: 0,
            window: limit.window,
        });

        // Expired windows also reset lazily when the same key returns
        if now.duration_since(window.started) >= limit.window {
            window.started = now;
            window.count = 0;
            window.window = limit.window;
        }

        if window.count >= limit.max_requests {
            return false;
        }

        window.count += 1;
        true
    }

    #[cfg(test)]
    fn tracked_windows(&self) -> usize {
        self.inner.windows.lock().unwrap().len()
    }
}

/// Rate-limiting middleware. On rejection the request short-circuits with
/// `RATE_LIMITED` before identity resolution or any procedure call.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.api.enable_rate_limiting {
        return Ok(next.run(request).await);
    }

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let caller_key = caller_key(&request);

    if !state.limiter.check(request.method(), &path, &caller_key) {
        tracing::warn!(endpoint = %path, caller = %caller_key, "rate limit exceeded");
        return Err(ApiError::rate_limited("Too many requests, try again later"));
    }

    Ok(next.run(request).await)
}

/// Caller key for quota accounting. Identity is not resolved yet at this
/// pipeline stage, so the key is proxy-header based, falling back to the
/// connection's peer address for direct clients.
fn caller_key(request: &Request) -> String {
    if let Some(ip) = forwarded_ip(request.headers()) {
        return ip;
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_hop) = forwarded.split(',').next() {
            let first_hop = first_hop.trim();
            if !first_hop.is_empty() {
                return Some(first_hop.to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }

    None
}
