// src/services/rate_limiter.rs
use std::{
    fmt::Debug,
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use tokio::time::interval;
use tracing::{debug, info};

pub const DEFAULT_MAX_REQUESTS: u32 = 60;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Fixed-window request counter keyed by client address.
pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
    max_requests: u32,
    window: Duration,
}

impl Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("clients", &self.windows.len())
            .finish()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count one request for `client` and decide whether it may proceed.
    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        // entry() holds the shard lock, so the read-modify-write is atomic per key
        let mut entry = self.windows.entry(client).or_insert(Window { started: now, hits: 0 });
        let window = entry.value_mut();

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.hits = 0;
        }

        if window.hits >= self.max_requests {
            let elapsed = now.duration_since(window.started);
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        window.hits += 1;
        Decision::Allowed {
            remaining: self.max_requests - window.hits,
        }
    }

    /// Drop windows that have fully elapsed. Returns number removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        // count inside retain, concurrent check() calls may insert meanwhile
        let mut removed = 0;
        self.windows.retain(|_, w| {
            let keep = now.duration_since(w.started) < self.window;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Periodically evict stale windows. Runs until the runtime shuts down.
    pub async fn run_purge_task(self: Arc<Self>) {
        let mut ticker = interval(self.window);
        info!(
            "Starting rate limit purge task with {:?} interval (max {} requests per window)",
            self.window, self.max_requests
        );

        loop {
            ticker.tick().await;
            let removed = self.purge_expired();
            if removed > 0 {
                debug!(removed, "purged expired rate limit windows");
            }
        }
    }
}
