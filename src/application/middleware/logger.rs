//! Structured request logging. Never alters the result it wraps.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::Instrument;

use super::Middleware;
use crate::application::identity::resolve_identity;
use crate::domain::traits::Handler;
use crate::domain::types::RequestContext;

pub struct Logger;

impl Middleware for Logger {
    fn name(&self) -> &'static str {
        "logger"
    }

    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(LoggedHandler { next })
    }
}

struct LoggedHandler {
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for LoggedHandler {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String> {
        let span = tracing::info_span!("request", user = %resolve_identity(&ctx));
        let start = Instant::now();

        async move {
            tracing::debug!(input = %input, "Processing command");

            let logged_input = input.clone();
            let result = self.next.handle(ctx, input).await;
            let duration = start.elapsed();

            match &result {
                Ok(_) => tracing::info!(
                    input = %logged_input,
                    duration_ms = duration.as_millis() as u64,
                    "Command completed"
                ),
                Err(e) => tracing::error!(
                    input = %logged_input,
                    error = %e,
                    "Error processing command"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, &'static str>);

    #[async_trait]
    impl Handler for Fixed {
        async fn handle(&self, _ctx: RequestContext, _input: String) -> Result<String> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(anyhow::anyhow!(msg)),
            }
        }
    }

    #[tokio::test]
    async fn test_passes_success_through() {
        let handler = Logger.wrap(Arc::new(Fixed(Ok("pong"))));
        let out = handler
            .handle(RequestContext::new().with_sender("alice"), "/ping".to_string())
            .await
            .unwrap();
        assert_eq!(out, "pong");
    }

    #[tokio::test]
    async fn test_passes_error_through() {
        let handler = Logger.wrap(Arc::new(Fixed(Err("boom"))));
        let err = handler
            .handle(RequestContext::new(), "/ping".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
