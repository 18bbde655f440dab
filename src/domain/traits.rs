//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Handlers, Commands, external services).
//! Allows for pluggable implementations in the Infrastructure and Interface layers.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::types::{Quote, RequestContext, ServiceError};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning the transport's message id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// A request handler: the unit every middleware wraps.
///
/// Soft failures are returned as `Ok` text; `Err` is reserved for hard failures.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String>;
}

/// A user-invocable command reached through a `/name` token.
#[async_trait]
pub trait Command: Send + Sync {
    /// Canonical name, matched case-insensitively
    fn name(&self) -> &str;

    /// Alternative names routed to the same command
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn description(&self) -> &str;

    async fn execute(&self, ctx: &RequestContext, args: &[String]) -> Result<String>;
}

/// Abstract interface for an LLM Provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a system + user prompt pair
    async fn completion(
        &self,
        ctx: &RequestContext,
        system: &str,
        prompt: &str,
    ) -> Result<String, ServiceError>;
}

/// Abstract interface for a cryptocurrency market data source
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Spot price of `coin` in `currency` (both lower-case ids, e.g. "bitcoin", "usd")
    async fn price(
        &self,
        ctx: &RequestContext,
        coin: &str,
        currency: &str,
    ) -> Result<Quote, ServiceError>;

    /// Market overview fields for `coin` quoted in USD
    async fn market_snapshot(
        &self,
        ctx: &RequestContext,
        coin: &str,
    ) -> Result<Map<String, Value>, ServiceError>;

    /// Full coin document (sentiment votes, historical price changes)
    async fn coin_details(&self, ctx: &RequestContext, coin: &str) -> Result<Value, ServiceError>;
}
