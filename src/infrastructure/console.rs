//! # Console Transport
//!
//! A local `ChatProvider` that reads messages from stdin and prints replies to stdout.
//! Each line is handled on its own task, like events from the Matrix sync loop.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::router::MessageRouter;
use crate::domain::traits::ChatProvider;
use crate::strings::logs;

#[derive(Clone)]
pub struct ConsoleService {
    room: String,
}

impl ConsoleService {
    pub fn new(room: impl Into<String>) -> Self {
        Self { room: room.into() }
    }
}

#[async_trait]
impl ChatProvider for ConsoleService {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        println!("{content}\n");
        Ok(String::new())
    }

    async fn typing(&self, _active: bool) -> Result<(), String> {
        Ok(())
    }

    fn room_id(&self) -> String {
        self.room.clone()
    }
}

/// Read stdin until EOF or Ctrl-C, dispatching each line as a message from `sender`.
pub async fn run(router: MessageRouter, sender: String) -> Result<()> {
    let chat = ConsoleService::new("console");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = tokio::task::JoinSet::new();

    tracing::info!("{}", logs::CONSOLE_START);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let router = router.clone();
                let chat = chat.clone();
                let sender = sender.clone();
                tasks.spawn(async move {
                    if let Err(e) = router.route(&chat, &line, &sender).await {
                        tracing::error!("Failed to route message: {}", e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("{}", logs::SHUTDOWN);
                return Ok(());
            }
        }
    }

    // Let in-flight replies finish after EOF
    while tasks.join_next().await.is_some() {}
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_chat_provider() {
        let chat = ConsoleService::new("console");
        assert_eq!(chat.room_id(), "console");
        assert!(chat.typing(true).await.is_ok());
        assert!(chat.send_message("hello").await.is_ok());
    }
}
