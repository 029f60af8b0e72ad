//! Per-client request limits for the dependency-injection lesson.

use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde_json::json;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::AppError;

const WINDOW: Duration = Duration::from_secs(60);

type KeyedLimiter =
    RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock, StateInformationMiddleware>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateTier {
    Normal,
    Strict,
}

struct Tier {
    limiter: KeyedLimiter,
    limit: u32,
}

impl Tier {
    fn per_minute(limit: u32) -> Self {
        let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(burst))
                .with_middleware::<StateInformationMiddleware>(),
            limit: burst.get(),
        }
    }

    /// Time for one request slot to replenish.
    fn replenish_interval(&self) -> Duration {
        WINDOW / self.limit
    }
}

/// Two keyed GCRA limiters (`normal` and `strict`) over a 60 second window.
///
/// The remaining capacity observed at each check is remembered per client so
/// the status endpoint can report it without spending a request.
pub struct RateLimitService {
    normal: Tier,
    strict: Tier,
    last_seen: RwLock<HashMap<(RateTier, String), (u32, Instant)>>,
}

impl RateLimitService {
    pub fn new(normal_per_minute: u32, strict_per_minute: u32) -> Self {
        Self {
            normal: Tier::per_minute(normal_per_minute),
            strict: Tier::per_minute(strict_per_minute),
            last_seen: RwLock::new(HashMap::new()),
        }
    }

    fn tier(&self, tier: RateTier) -> &Tier {
        match tier {
            RateTier::Normal => &self.normal,
            RateTier::Strict => &self.strict,
        }
    }

    pub fn limit(&self, tier: RateTier) -> u32 {
        self.tier(tier).limit
    }

    pub fn window(&self) -> Duration {
        WINDOW
    }

    /// Spends one request for `client`. Returns the remaining capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TooManyRequests`] once the client has used up its quota.
    pub async fn check(&self, tier: RateTier, client: &str) -> Result<u32, AppError> {
        let t = self.tier(tier);
        let key = client.to_string();

        let outcome = t.limiter.check_key(&key);
        let remaining = match &outcome {
            Ok(snapshot) => snapshot.remaining_burst_capacity(),
            Err(_) => 0,
        };
        self.last_seen
            .write()
            .await
            .insert((tier, key), (remaining, Instant::now()));

        match outcome {
            Ok(_) => {
                tracing::debug!(client, ?tier, remaining, "Rate limit check passed");
                Ok(remaining)
            }
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(DefaultClock::default().now());
                tracing::warn!(client, ?tier, "Rate limit exceeded");
                metrics::counter!("rate_limit_rejections_total").increment(1);

                Err(AppError::too_many_requests(
                    format!(
                        "Rate limit exceeded. Max {} requests per {} seconds.",
                        t.limit,
                        WINDOW.as_secs()
                    ),
                    json!({
                        "limit": t.limit,
                        "window_seconds": WINDOW.as_secs(),
                        "retry_after_seconds": retry_after.as_secs_f64().ceil() as u64,
                    }),
                ))
            }
        }
    }

    /// Drops limiter state that is back to its initial value and remembered
    /// capacities older than `idle`. Returns the number of remembered entries removed.
    pub async fn prune(&self, idle: Duration) -> usize {
        self.normal.limiter.retain_recent();
        self.strict.limiter.retain_recent();

        let mut last_seen = self.last_seen.write().await;
        let before = last_seen.len();
        last_seen.retain(|_, (_, at)| at.elapsed() < idle);
        before - last_seen.len()
    }

    /// Number of clients with limiter state in either tier.
    pub fn tracked_clients(&self) -> usize {
        self.normal.limiter.len() + self.strict.limiter.len()
    }

    /// Remaining capacity for `client` right now, without spending a request.
    pub async fn remaining(&self, tier: RateTier, client: &str) -> u32 {
        let t = self.tier(tier);
        let last_seen = self.last_seen.read().await;

        let Some(&(remaining, at)) = last_seen.get(&(tier, client.to_string())) else {
            return t.limit;
        };

        let replenished = at.elapsed().as_nanos() / t.replenish_interval().as_nanos().max(1);
        let replenished = u32::try_from(replenished).unwrap_or(u32::MAX);
        remaining.saturating_add(replenished).min(t.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_normal_tier_allows_ten_then_rejects() {
        let limits = RateLimitService::new(10, 5);

        for _ in 0..10 {
            limits.check(RateTier::Normal, "1.2.3.4").await.unwrap();
        }

        let err = limits.check(RateTier::Normal, "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, AppError::TooManyRequests { .. }));
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Max 10 requests per 60 seconds."
        );
    }

    #[tokio::test]
    async fn test_clients_are_limited_independently() {
        let limits = RateLimitService::new(10, 5);

        for _ in 0..5 {
            limits.check(RateTier::Strict, "a").await.unwrap();
        }
        assert!(limits.check(RateTier::Strict, "a").await.is_err());
        assert!(limits.check(RateTier::Strict, "b").await.is_ok());
    }

    #[tokio::test]
    async fn test_remaining_does_not_consume() {
        let limits = RateLimitService::new(10, 5);

        assert_eq!(limits.remaining(RateTier::Normal, "c").await, 10);
        assert_eq!(limits.check(RateTier::Normal, "c").await.unwrap(), 9);
        assert_eq!(limits.remaining(RateTier::Normal, "c").await, 9);
        assert_eq!(limits.remaining(RateTier::Normal, "c").await, 9);
        assert_eq!(limits.remaining(RateTier::Strict, "c").await, 5);
    }

    #[tokio::test]
    async fn test_prune_forgets_idle_clients() {
        let limits = RateLimitService::new(10, 5);
        limits.check(RateTier::Normal, "d").await.unwrap();
        limits.check(RateTier::Strict, "e").await.unwrap();

        assert_eq!(limits.prune(WINDOW).await, 0);
        assert_eq!(limits.remaining(RateTier::Normal, "d").await, 9);

        assert_eq!(limits.prune(Duration::ZERO).await, 2);
        assert_eq!(limits.remaining(RateTier::Normal, "d").await, 10);
    }
}
