//! # Domain Types
//!
//! Common data structures used across the dispatch pipeline and the service adapters.

use std::time::Duration;
use tokio::time::Instant;

/// Secondary context keys used to derive an identity when no sender is known.
pub const HINT_KEYS: [&str; 3] = ["remote_addr", "user_agent", "session_id"];

/// Per-request execution context.
///
/// Carries the sender identity and the deadline through every pipeline layer. It is cheap to
/// clone and owned by each layer, so a handler running on a detached task can keep it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    sender: Option<String>,
    hints: Vec<(String, String)>,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Attach a secondary value such as `remote_addr` or `session_id`.
    pub fn with_hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hints.push((key.into(), value.into()));
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Child context whose deadline is the earlier of the current one and `now + timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        self.with_deadline(deadline)
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn hint(&self, key: &str) -> Option<&str> {
        self.hints
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when the context is unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }

    /// Bound a per-call timeout by the time left on the request.
    pub fn bounded(&self, limit: Duration) -> Duration {
        self.remaining().map_or(limit, |r| r.min(limit))
    }
}

/// Error raised by an external service adapter (market data, question answering).
#[derive(Debug, Clone)]
pub struct ServiceError {
    pub service: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &str, message: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.service, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// A spot price for one coin in one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub coin: String,
    pub currency: String,
    pub price: f64,
}

/// One line of the `/help` catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
}
