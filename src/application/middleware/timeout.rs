//! Bounded execution time.
//!
//! The wrapped handler runs on its own task and is raced against the request deadline. When
//! the deadline wins, the caller gets a fixed reply and the task is detached rather than
//! aborted: it may still finish later, and its result is dropped. Commands that make outbound
//! calls bound them with [`RequestContext::bounded`] so detached work does not linger.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::Middleware;
use crate::domain::traits::Handler;
use crate::domain::types::RequestContext;
use crate::strings::messages;

pub struct Timeout {
    duration: Duration,
}

impl Timeout {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Middleware for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(TimedHandler {
            duration: self.duration,
            next,
        })
    }
}

struct TimedHandler {
    duration: Duration,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for TimedHandler {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String> {
        let ctx = ctx.with_timeout(self.duration);
        let deadline = ctx.deadline().unwrap_or_else(|| tokio::time::Instant::now() + self.duration);

        let next = self.next.clone();
        let task = tokio::spawn(async move { next.handle(ctx, input).await });

        match tokio::time::timeout_at(deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(anyhow!("handler task failed: {join_error}")),
            Err(_) => {
                tracing::warn!(timeout_ms = self.duration.as_millis() as u64, "Command timed out");
                Ok(messages::TIMED_OUT.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Sleepy {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Handler for Sleepy {
        async fn handle(&self, _ctx: RequestContext, input: String) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(input)
        }
    }

    struct Never;

    #[async_trait]
    impl Handler for Never {
        async fn handle(&self, _ctx: RequestContext, _input: String) -> Result<String> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    struct Panics;

    #[async_trait]
    impl Handler for Panics {
        async fn handle(&self, _ctx: RequestContext, _input: String) -> Result<String> {
            panic!("command bug");
        }
    }

    struct SeesDeadline;

    #[async_trait]
    impl Handler for SeesDeadline {
        async fn handle(&self, ctx: RequestContext, _input: String) -> Result<String> {
            Ok(format!("{:?}", ctx.remaining()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_returning_handler_times_out_softly() {
        let handler = Timeout::new(Duration::from_secs(25)).wrap(Arc::new(Never));
        let out = handler
            .handle(RequestContext::new(), "/slow".to_string())
            .await
            .unwrap();
        assert_eq!(out, messages::TIMED_OUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_handler_result_is_returned() {
        let finished = Arc::new(AtomicBool::new(false));
        let handler = Timeout::new(Duration::from_secs(5)).wrap(Arc::new(Sleepy {
            delay: Duration::from_secs(1),
            finished: finished.clone(),
        }));
        let out = handler
            .handle(RequestContext::new(), "done".to_string())
            .await
            .unwrap();
        assert_eq!(out, "done");
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_task_keeps_running_detached() {
        let finished = Arc::new(AtomicBool::new(false));
        let handler = Timeout::new(Duration::from_secs(1)).wrap(Arc::new(Sleepy {
            delay: Duration::from_secs(2),
            finished: finished.clone(),
        }));

        let out = handler
            .handle(RequestContext::new(), "late".to_string())
            .await
            .unwrap();
        assert_eq!(out, messages::TIMED_OUT);
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_deadline_is_respected() {
        let handler = Timeout::new(Duration::from_secs(30)).wrap(Arc::new(Never));
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        let out = handler.handle(ctx, "x".to_string()).await.unwrap();
        assert_eq!(out, messages::TIMED_OUT);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inner_context_carries_the_deadline() {
        let handler = Timeout::new(Duration::from_secs(10)).wrap(Arc::new(SeesDeadline));
        let out = handler.handle(RequestContext::new(), String::new()).await.unwrap();
        assert_eq!(out, "Some(10s)");
    }

    #[tokio::test]
    async fn test_panicking_handler_is_a_hard_error() {
        let handler = Timeout::new(Duration::from_secs(5)).wrap(Arc::new(Panics));
        let result = handler.handle(RequestContext::new(), String::new()).await;
        assert!(result.is_err());
    }
}
