//! Pacing for calls to external services.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default gap between consecutive geocoder calls.
pub const DEFAULT_CALL_SPACING: Duration = Duration::from_millis(100);

/// Gate that decides when the next external call may start.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a call is allowed, then record that one is starting.
    async fn until_ready(&self);
}

/// Enforces a fixed minimum gap since the previous permitted call.
///
/// The first call passes immediately.
#[derive(Debug)]
pub struct FixedDelayLimiter {
    spacing: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl FixedDelayLimiter {
    /// Limiter with the given minimum gap.
    #[must_use]
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_call: Mutex::new(None),
        }
    }

    /// The configured minimum gap.
    #[must_use]
    pub const fn spacing(&self) -> Duration {
        self.spacing
    }
}

impl Default for FixedDelayLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_SPACING)
    }
}

#[async_trait]
impl RateLimiter for FixedDelayLimiter {
    async fn until_ready(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            tokio::time::sleep_until(previous + self.spacing).await;
        }
        *last_call = Some(Instant::now());
    }
}

/// Limiter that never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn until_ready(&self) {}
}
