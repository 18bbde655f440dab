//! # Middleware Pipeline
//!
//! Handler-wrapping layers composed once at startup around the command registry.
//! The standard chain, outermost first, is Logger → RateLimit → Timeout → registry.

pub mod logger;
pub mod rate_limit;
pub mod timeout;

use std::sync::Arc;

use crate::domain::config::LimitsConfig;
use crate::domain::traits::Handler;

pub use logger::Logger;
pub use rate_limit::{RateLimit, RateLimiter};
pub use timeout::Timeout;

/// A layer that decorates the next handler in the chain.
pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler>;
}

/// Collects layers in outer-to-inner order and folds them around an inner handler.
#[derive(Default)]
pub struct PipelineBuilder {
    layers: Vec<Box<dyn Middleware>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer inside the ones already added.
    pub fn layer(mut self, middleware: impl Middleware + 'static) -> Self {
        self.layers.push(Box::new(middleware));
        self
    }

    pub fn build(self, inner: Arc<dyn Handler>) -> Pipeline {
        let names = self.layers.iter().map(|m| m.name()).collect();
        let handler = self
            .layers
            .iter()
            .rev()
            .fold(inner, |next, middleware| middleware.wrap(next));
        Pipeline { handler, names }
    }
}

/// The composed handler plus the order it was built in.
#[derive(Clone)]
pub struct Pipeline {
    handler: Arc<dyn Handler>,
    names: Vec<&'static str>,
}

impl Pipeline {
    /// Logger → RateLimit → Timeout around `inner`.
    pub fn standard(limits: &LimitsConfig, limiter: Arc<RateLimiter>, inner: Arc<dyn Handler>) -> Self {
        PipelineBuilder::new()
            .layer(Logger)
            .layer(RateLimit::new(limiter))
            .layer(Timeout::new(limits.command_timeout()))
            .build(inner)
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        self.handler.clone()
    }

    /// Layer names, outermost first.
    pub fn layers(&self) -> &[&'static str] {
        &self.names
    }
}
