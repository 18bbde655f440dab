//! # Help Command
//!
//! Handles `/help`.
//! Renders the catalogue of registered commands, sorted by name.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Weak;

use crate::application::registry::CommandRegistry;
use crate::domain::traits::Command;
use crate::domain::types::{CommandSummary, RequestContext};
use crate::strings::help;

/// Holds a weak reference because the registry owns this command.
pub struct HelpCommand {
    registry: Weak<CommandRegistry>,
}

impl HelpCommand {
    pub fn new(registry: Weak<CommandRegistry>) -> Self {
        Self { registry }
    }
}

pub fn render_help(catalogue: &[CommandSummary]) -> String {
    let mut text = String::from(help::HEADER);
    for entry in catalogue {
        text.push_str(&help::command_line(&entry.name, &entry.description));
        if !entry.aliases.is_empty() {
            let aliases: Vec<&str> = entry.aliases.iter().map(String::as_str).collect();
            text.push_str(&help::alias_line(&aliases));
        }
        text.push('\n');
    }
    text.push_str(help::FOOTER);
    text
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["h", "ayuda"]
    }

    fn description(&self) -> &str {
        "Shows available commands and usage information"
    }

    async fn execute(&self, _ctx: &RequestContext, _args: &[String]) -> Result<String> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| anyhow!("Command registry is no longer available"))?;
        Ok(render_help(&registry.catalogue()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::tests::EchoCommand;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_help_lists_commands_sorted_with_aliases() {
        let registry = Arc::new_cyclic(|weak| {
            let mut registry = CommandRegistry::new(None);
            registry.register(Arc::new(EchoCommand::new("price", &["p", "precio"])));
            registry.register(Arc::new(HelpCommand::new(weak.clone())));
            registry
        });

        let text = registry
            .execute(&RequestContext::new(), "/ayuda")
            .await
            .unwrap();
        assert_eq!(
            text,
            "*Available Commands:*\n\n\
             /help - Shows available commands and usage information\n  Aliases: /h, /ayuda\n\n\
             /price - Echoes its arguments\n  Aliases: /p, /precio\n\n\
             You can also ask me questions directly!"
        );
    }

    #[test]
    fn test_render_help_without_aliases() {
        let catalogue = vec![CommandSummary {
            name: "ping".to_string(),
            aliases: Vec::new(),
            description: "Pong".to_string(),
        }];
        assert_eq!(
            render_help(&catalogue),
            "*Available Commands:*\n\n/ping - Pong\n\nYou can also ask me questions directly!"
        );
    }

    #[tokio::test]
    async fn test_help_after_registry_dropped() {
        let help = HelpCommand::new(Weak::new());
        assert!(help.execute(&RequestContext::new(), &[]).await.is_err());
    }
}
