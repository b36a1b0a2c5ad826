// SPDX-License-Identifier: MIT

//! Per-IP fixed-window rate limiting.
//!
//! 100 requests per 15-minute window per client IP, tracked in process
//! memory. Windows reset lazily on the next request after expiry; the
//! table is purged wholesale only when it grows unusually large.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::error::AppError;
use crate::AppState;

pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;

/// Stale-entry purge kicks in above this table size.
const PURGE_THRESHOLD: usize = 10_000;

struct Window {
    count: u32,
    started: Instant,
}

/// Shared fixed-window request counter.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
        }
    }

    /// Count one request from `ip`. Returns false once the window's budget
    /// is spent.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();

        if self.windows.len() > PURGE_THRESHOLD {
            self.windows
                .retain(|_, w| now.duration_since(w.started) <= self.window);
        }

        let mut entry = self.windows.entry(ip).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) > self.window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_WINDOW, RATE_LIMIT_MAX_REQUESTS)
    }
}

/// Middleware applying the shared limiter to each request.
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if !state.rate_limiter.check(ip) {
        tracing::warn!(ip = %ip, "Rate limit exceeded");
        return Err(AppError::TooManyRequests(
            "Too many requests, please try again after 15 minutes".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        // No connect info (e.g. in-process tests): fall back to one bucket
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn allows_up_to_the_budget() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);

        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn budgets_are_per_ip() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);

        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let limiter = RateLimiter::new(Duration::from_nanos(1), 1);

        assert!(limiter.check(ip(1)));
        std::thread::sleep(Duration::from_millis(1));
        assert!(limiter.check(ip(1)));
    }
}
