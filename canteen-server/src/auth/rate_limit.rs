//! Application-layer rate limiting for the admin login route

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Login attempts allowed per IP and window
pub const LOGIN_MAX_REQUESTS: u32 = 5;
pub const LOGIN_WINDOW_SECS: u64 = 60;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
    /// Key clients by X-Forwarded-For (only behind a proxy that sets it)
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            inner: Arc::default(),
            trust_forwarded_for,
        }
    }

    /// Client key for a request
    ///
    /// The peer address by default. With `trust_forwarded_for`, the last
    /// X-Forwarded-For hop, which is the one the fronting proxy appended.
    pub fn client_ip(&self, request: &Request) -> String {
        if self.trust_forwarded_for
            && let Some(forwarded) = request.headers().get("x-forwarded-for")
            && let Ok(val) = forwarded.to_str()
            && let Some(last) = val.rsplit(',').next()
        {
            let ip = last.trim();
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

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Drop windows older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked_ips(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// Rate limit middleware for admin login: 5 requests/minute per IP
pub async fn login_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = state.rate_limiter.client_ip(&request);
    if !state
        .rate_limiter
        .check("login", &ip, LOGIN_MAX_REQUESTS, LOGIN_WINDOW_SECS)
        .await
    {
        tracing::warn!(ip = %ip, "Admin login rate limited");
        return Err(AppError::too_many_requests());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let limiter = RateLimiter::new(false);
        for _ in 0..5 {
            assert!(limiter.check("login", "10.0.0.1", 5, 60).await);
        }
        assert!(!limiter.check("login", "10.0.0.1", 5, 60).await);
        // Other clients keep their own budget
        assert!(limiter.check("login", "10.0.0.2", 5, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(false);
        assert!(limiter.check("login", "10.0.0.1", 1, 60).await);
        assert!(!limiter.check("login", "10.0.0.1", 1, 60).await);
        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("login", "10.0.0.1", 1, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new(false);
        limiter.check("login", "10.0.0.1", 5, 60).await;
        assert_eq!(limiter.tracked_ips().await, 1);
        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_ips().await, 0);
    }

    fn request(forwarded_for: Option<&str>, peer: Option<&str>) -> Request {
        let mut builder = Request::builder();
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: std::net::SocketAddr = peer.parse().unwrap();
            request
                .extensions_mut()
                .insert(axum::extract::ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn test_client_ip_ignores_forwarded_header_by_default() {
        let limiter = RateLimiter::new(false);
        let spoofed = request(Some("203.0.113.7"), Some("198.51.100.2:40000"));
        assert_eq!(limiter.client_ip(&spoofed), "198.51.100.2");
        assert_eq!(limiter.client_ip(&request(Some("203.0.113.7"), None)), "unknown");
    }

    #[test]
    fn test_client_ip_behind_trusted_proxy() {
        let limiter = RateLimiter::new(true);
        let proxied = request(Some("203.0.113.7, 192.0.2.10"), Some("10.0.0.1:40000"));
        assert_eq!(limiter.client_ip(&proxied), "192.0.2.10");
        // No header: fall back to the peer
        assert_eq!(
            limiter.client_ip(&request(None, Some("10.0.0.1:40000"))),
            "10.0.0.1"
        );
    }
}
