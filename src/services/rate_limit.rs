// src/services/rate_limit.rs
// DOCUMENTATION: Per-email throttling of password-reset OTP requests

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::HorooError;

/// Checks between sweeps of keys whose quota has fully refilled
const SWEEP_EVERY: u64 = 256;

type KeyedLimiter<C> =
    RateLimiter<String, DashMapStateStore<String>, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Keyed GCRA limiter shared by the owner and user reset flows
pub struct OtpLimiter<C: Clock = DefaultClock> {
    inner: KeyedLimiter<C>,
    checks: AtomicU64,
}

impl OtpLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_clock(requests_per_minute, &DefaultClock::default())
    }
}

impl<C: Clock> OtpLimiter<C> {
    pub fn with_clock(requests_per_minute: u32, clock: &C) -> Self {
        let burst = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        OtpLimiter {
            inner: RateLimiter::dashmap_with_clock(Quota::per_minute(burst), clock),
            checks: AtomicU64::new(0),
        }
    }

    /// Consume one request for this email; 429 once the quota is spent
    pub fn check(&self, email: &str) -> Result<(), HorooError> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.inner.retain_recent();
            log::debug!("OTP limiter tracking {} emails after sweep", self.inner.len());
        }

        self.inner.check_key(&email.to_string()).map_err(|_| {
            log::warn!("OTP request rate limit hit for {}", email);
            HorooError::RateLimitExceeded
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::clock::FakeRelativeClock;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_quota_per_email() {
        let limiter = OtpLimiter::new(2);
        assert_ok!(limiter.check("a@example.com"));
        assert_ok!(limiter.check("a@example.com"));
        assert!(matches!(
            limiter.check("a@example.com"),
            Err(HorooError::RateLimitExceeded)
        ));
        // Other keys are unaffected
        assert_ok!(limiter.check("b@example.com"));
    }

    #[test]
    fn test_zero_quota_still_allows_one() {
        let limiter = OtpLimiter::new(0);
        assert_ok!(limiter.check("a@example.com"));
        assert_err!(limiter.check("a@example.com"));
    }

    #[test]
    fn test_idle_emails_are_swept() {
        let clock = FakeRelativeClock::default();
        let limiter = OtpLimiter::with_clock(3, &clock);

        for i in 0..SWEEP_EVERY - 1 {
            assert_ok!(limiter.check(&format!("user{}@example.com", i)));
        }
        assert_eq!(limiter.inner.len(), (SWEEP_EVERY - 1) as usize);

        clock.advance(Duration::from_secs(120));
        assert_ok!(limiter.check("fresh@example.com"));
        assert_eq!(limiter.inner.len(), 1);
    }

    #[test]
    fn test_sweep_keeps_throttled_emails() {
        let clock = FakeRelativeClock::default();
        let limiter = OtpLimiter::with_clock(1, &clock);

        assert_ok!(limiter.check("a@example.com"));
        for i in 0..SWEEP_EVERY - 2 {
            assert_ok!(limiter.check(&format!("user{}@example.com", i)));
        }
        // This check triggers the sweep; nothing has refilled yet
        assert_err!(limiter.check("a@example.com"));
        assert_err!(limiter.check("a@example.com"));
    }
}
