//! Per-identity rate limiting.
//!
//! [`RateLimiter`] owns the counters and is shared through an `Arc`; [`RateLimit`] is the
//! middleware that consults it. Each identity gets a fixed window that restarts on the first
//! request after it expires.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::Middleware;
use crate::application::identity::resolve_identity;
use crate::domain::traits::Handler;
use crate::domain::types::RequestContext;
use crate::strings::messages;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited,
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Counter store keyed by identity.
///
/// Windows live in a sharded map; the shard lock is held only while one window is updated,
/// never while the wrapped handler runs. Entries are never evicted: the map holds one window
/// per identity seen during the process lifetime.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    period: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit,
            period,
            windows: DashMap::new(),
        }
    }

    /// Count one request for `identity`. A limited request is not counted.
    pub fn check(&self, identity: &str) -> Decision {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry(identity.to_string())
            .or_insert_with(|| {
                tracing::debug!(identity, "Tracking new identity");
                Window {
                    count: 0,
                    reset_at: now + self.period,
                }
            });

        if now > window.reset_at {
            window.count = 0;
            window.reset_at = now + self.period;
        }

        if window.count >= self.limit {
            return Decision::Limited;
        }

        window.count += 1;
        Decision::Allowed
    }

    /// Number of identities with a window.
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }
}

/// Middleware that short-circuits with a fixed reply once an identity exceeds its quota.
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl Middleware for RateLimit {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(RateLimitedHandler {
            limiter: self.limiter.clone(),
            next,
        })
    }
}

struct RateLimitedHandler {
    limiter: Arc<RateLimiter>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for RateLimitedHandler {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String> {
        let identity = resolve_identity(&ctx);
        match self.limiter.check(&identity) {
            Decision::Allowed => self.next.handle(ctx, input).await,
            Decision::Limited => {
                tracing::info!(
                    identity = %identity,
                    tracked = self.limiter.tracked_identities(),
                    "Rate limit reached"
                );
                Ok(messages::RATE_LIMITED.to_string())
            }
        }
    }
}
