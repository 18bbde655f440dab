//! # Message Router
//!
//! Entry point for inbound messages from any transport. Builds the request context, runs the
//! middleware pipeline, and sends the reply back through the `ChatProvider`.
//! Hard failures are logged here and replaced by a generic apology.

use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

use crate::application::middleware::Pipeline;
use crate::domain::traits::{ChatProvider, Handler};
use crate::domain::types::RequestContext;
use crate::strings::{logs, messages};

#[derive(Clone)]
pub struct MessageRouter {
    pipeline: Arc<dyn Handler>,
    command_timeout: Duration,
}

impl MessageRouter {
    pub fn new(pipeline: &Pipeline, command_timeout: Duration) -> Self {
        Self {
            pipeline: pipeline.handler(),
            command_timeout,
        }
    }

    /// Produce the reply for one message. Never fails: hard errors become an apology.
    pub async fn respond(&self, message: &str, sender: &str) -> String {
        self.dispatch(RequestContext::new().with_sender(sender), message).await
    }

    async fn dispatch(&self, ctx: RequestContext, message: &str) -> String {
        let ctx = ctx.with_timeout(self.command_timeout);
        let sender = ctx.sender().unwrap_or_default().to_string();

        match self.pipeline.handle(ctx, message.to_string()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(sender = %sender, error = %e, "Error processing message");
                messages::PROCESSING_ERROR.to_string()
            }
        }
    }

    /// Handle a message received on `chat` and send the reply back to the same room.
    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + ?Sized,
    {
        if message.is_empty() {
            return Ok(());
        }

        tracing::info!(room = %chat.room_id(), sender, "Router dispatching message");

        if let Err(e) = chat.typing(true).await {
            tracing::debug!("Typing notice failed: {}", e);
        }
        // The room stands in for a session when the sender id is unusable
        let ctx = RequestContext::new()
            .with_sender(sender)
            .with_hint("session_id", chat.room_id());
        let reply = self.dispatch(ctx, message).await;
        if let Err(e) = chat.typing(false).await {
            tracing::debug!("Typing notice failed: {}", e);
        }

        if reply.is_empty() {
            return Ok(());
        }

        chat.send_message(&reply)
            .await
            .map(|_| ())
            .map_err(|e| anyhow!(logs::send_failed(&e)))
    }
}
