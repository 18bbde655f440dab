//! # Command Registry
//!
//! Maps command names and aliases to commands and dispatches sanitized input to them.
//! Non-command text goes to the default handler (the question path).

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::application::parsing::{strip_command_prefix, tokenize};
use crate::application::sanitize::{sanitize_command, sanitize_input};
use crate::domain::traits::{Command, Handler};
use crate::domain::types::{CommandSummary, RequestContext};
use crate::strings::{logs, messages};

pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
    default_handler: Option<Arc<dyn Handler>>,
}

impl CommandRegistry {
    pub fn new(default_handler: Option<Arc<dyn Handler>>) -> Self {
        Self {
            commands: HashMap::new(),
            default_handler,
        }
    }

    /// Register `command` under its canonical name and every alias.
    ///
    /// Keys are lower-cased. A key that is already taken is overwritten (last registration
    /// wins) and the overwrite is logged.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let keys = std::iter::once(command.name()).chain(command.aliases().iter().copied());
        for key in keys {
            let key = key.trim().to_lowercase();
            if let Some(previous) = self.commands.insert(key.clone(), command.clone())
                && !Arc::ptr_eq(&previous, &command)
            {
                tracing::warn!("{}", logs::alias_overwritten(&key, previous.name(), command.name()));
            }
        }
    }

    /// Look up a command by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(&name.to_lowercase())
    }

    /// One summary per unique command still reachable by its canonical name, sorted by name.
    pub fn catalogue(&self) -> Vec<CommandSummary> {
        let unique: BTreeMap<String, &Arc<dyn Command>> = self
            .commands
            .iter()
            .filter(|(key, cmd)| **key == cmd.name().to_lowercase())
            .map(|(key, cmd)| (key.clone(), cmd))
            .collect();

        unique
            .into_values()
            .map(|cmd| CommandSummary {
                name: cmd.name().to_string(),
                aliases: cmd.aliases().iter().map(|a| a.to_string()).collect(),
                description: cmd.description().to_string(),
            })
            .collect()
    }

    /// Sanitize, tokenize and dispatch one message.
    ///
    /// Unknown commands and a missing default handler produce fixed replies; errors from a
    /// command or the default handler are returned unchanged.
    pub async fn execute(&self, ctx: &RequestContext, input: &str) -> Result<String> {
        let input = sanitize_input(input);

        let mut tokens = tokenize(&input);
        if tokens.is_empty() {
            return Ok(messages::USAGE_HINT.to_string());
        }
        let args = tokens.split_off(1);
        let first = &tokens[0];

        if let Some(bare) = strip_command_prefix(first) {
            let (name, args) = sanitize_command(bare, &args);
            return match self.get(&name) {
                // Deadline already passed, e.g. a task detached by the timeout layer
                Some(_) if ctx.is_expired() => {
                    tracing::debug!(command = %name, "Deadline passed before dispatch");
                    Ok(messages::TIMED_OUT.to_string())
                }
                Some(command) => {
                    tracing::debug!(command = command.name(), args = ?args, "Dispatching command");
                    command.execute(ctx, &args).await
                }
                None => Ok(messages::UNKNOWN_COMMAND.to_string()),
            };
        }

        match &self.default_handler {
            Some(handler) => handler.handle(ctx.clone(), input).await,
            None => Ok(messages::FALLBACK_REPLY.to_string()),
        }
    }
}

#[async_trait]
impl Handler for CommandRegistry {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String> {
        self.execute(&ctx, &input).await
    }
}
