//! # Command Handlers
//!
//! The commands users can invoke (`/price`, `/recommend`, `/help`) and the default question
//! handler, plus `build_registry` which wires them into a `CommandRegistry`.

pub mod help;
pub mod price;
pub mod question;
pub mod recommend;

use std::sync::Arc;

use crate::application::registry::CommandRegistry;
use crate::domain::traits::{LlmProvider, MarketDataProvider};

use help::HelpCommand;
use price::PriceCommand;
use question::QuestionHandler;
use recommend::RecommendCommand;

/// Registry with every built-in command and the question handler as default.
pub fn build_registry(
    market: Arc<dyn MarketDataProvider>,
    llm: Arc<dyn LlmProvider>,
) -> Arc<CommandRegistry> {
    Arc::new_cyclic(|weak| {
        let mut registry = CommandRegistry::new(Some(Arc::new(QuestionHandler::new(llm.clone()))));
        registry.register(Arc::new(PriceCommand::new(market.clone())));
        registry.register(Arc::new(RecommendCommand::new(market, llm)));
        registry.register(Arc::new(HelpCommand::new(weak.clone())));
        registry
    })
}
