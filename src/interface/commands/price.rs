//! # Price Command
//!
//! Handles `/price <coin> [in|to|en <currency>]`.
//! Looks up a spot price through the market data provider.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::traits::{Command, MarketDataProvider};
use crate::domain::types::RequestContext;
use crate::strings::messages;

pub const DEFAULT_CURRENCY: &str = "usd";

const CURRENCY_KEYWORDS: [&str; 3] = ["in", "to", "en"];

pub struct PriceCommand {
    market: Arc<dyn MarketDataProvider>,
}

impl PriceCommand {
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

/// Split arguments into a lower-cased `(coin, currency)` pair.
///
/// `bitcoin cash in eur` -> `("bitcoin cash", "eur")`; without a keyword the whole argument list
/// is the coin and the currency defaults to USD.
pub fn parse_price_args(args: &[String]) -> (String, String) {
    let n = args.len();
    if n >= 2 && CURRENCY_KEYWORDS.contains(&args[n - 2].to_lowercase().as_str()) {
        let currency = args[n - 1].to_lowercase();
        let currency = if currency.is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            currency
        };
        return (args[..n - 2].join(" ").to_lowercase(), currency);
    }
    (args.join(" ").to_lowercase(), DEFAULT_CURRENCY.to_string())
}

#[async_trait]
impl Command for PriceCommand {
    fn name(&self) -> &str {
        "price"
    }

    fn aliases(&self) -> &[&str] {
        &["p", "precio"]
    }

    fn description(&self) -> &str {
        "Get the price of a cryptocurrency"
    }

    async fn execute(&self, ctx: &RequestContext, args: &[String]) -> Result<String> {
        if args.is_empty() {
            return Ok(messages::PRICE_USAGE.to_string());
        }

        let (coin, currency) = parse_price_args(args);
        let quote = self.market.price(ctx, &coin, &currency).await?;
        Ok(messages::price_quote(&quote.coin, quote.price, &quote.currency))
    }
}
