//! Reactive rate limiting for the Discord API
//!
//! Requests go out unthrottled until Discord answers with a 429. From then on
//! every request waits on a governor quota matching Discord's global limit.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use serde::Deserialize;

/// Discord's global limit for bot tokens: 50 requests per second.
pub const GLOBAL_REQUESTS_PER_SECOND: u32 = 50;

/// How many times a single request is retried after a 429.
pub const MAX_RATE_LIMIT_RETRIES: usize = 3;

/// Fallback wait when a 429 carries no usable retry hint.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Body Discord sends with a 429 response.
#[derive(Debug, Deserialize)]
pub struct RateLimitBody {
    /// Seconds to wait, fractional
    pub retry_after: f64,
    /// Whether the global limit (rather than a route bucket) was hit
    #[serde(default)]
    pub global: bool,
}

/// Work out how long to wait from a 429 response.
///
/// The JSON body wins over the `retry-after` header since it has
/// millisecond precision.
pub fn retry_after(header: Option<&str>, body: &str) -> Duration {
    if let Ok(parsed) = serde_json::from_str::<RateLimitBody>(body) {
        if parsed.global {
            debug!("Global rate limit hit");
        }
        if let Ok(wait) = Duration::try_from_secs_f64(parsed.retry_after) {
            return wait;
        }
    }

    header
        .and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Limiter that only throttles after the first 429.
pub struct ReactiveRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
}

impl Default for ReactiveRateLimiter {
    fn default() -> Self {
        Self::new(GLOBAL_REQUESTS_PER_SECOND)
    }
}

impl ReactiveRateLimiter {
    pub fn new(per_second: u32) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::direct(quota),
            active: AtomicBool::new(false),
        }
    }

    /// Start throttling (called on 429).
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for a slot if throttling is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            self.limiter.until_ready().await;
        }
    }
}
