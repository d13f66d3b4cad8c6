//! Rate limiting for probes.
//!
//! Token bucket limiter that paces how fast new connect attempts are issued,
//! independent of how many may be in flight at once.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

/// A shared probes-per-second limiter.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` probes per second.
    ///
    /// Returns `None` for a rate of 0, which means unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        Self::with_burst(rate, 1)
    }

    /// Create a limiter that lets `burst` probes through back to back before
    /// pacing kicks in. A burst of 0 is treated as 1.
    pub fn with_burst(rate: u32, burst: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        let burst = NonZeroU32::new(burst).unwrap_or(nonzero!(1u32));
        let quota = Quota::per_second(rate).allow_burst(burst);

        Some(Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        })
    }

    /// Wait until the next probe may be issued.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a token without waiting. Returns `false` if none was available.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
