//! # Recommend Command
//!
//! Handles `/recommend <coin>`.
//! Builds a market summary from the market data provider, adds sentiment and historical price
//! changes when available, and asks the LLM for an assessment.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fmt::Write;
use std::sync::Arc;

use crate::domain::traits::{Command, LlmProvider, MarketDataProvider};
use crate::domain::types::RequestContext;
use crate::strings::{messages, prompts};

const HISTORICAL_CHANGE_KEYS: [&str; 4] = [
    "price_change_percentage_7d",
    "price_change_percentage_14d",
    "price_change_percentage_30d",
    "price_change_percentage_60d",
];

const SENTIMENT_KEYS: [&str; 2] = [
    "sentiment_votes_up_percentage",
    "sentiment_votes_down_percentage",
];

pub struct RecommendCommand {
    market: Arc<dyn MarketDataProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl RecommendCommand {
    pub fn new(market: Arc<dyn MarketDataProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { market, llm }
    }

    async fn market_summary(&self, ctx: &RequestContext, coin: &str) -> Result<String> {
        let snapshot = self.market.market_snapshot(ctx, coin).await?;
        let mut summary = format_snapshot(&snapshot);

        match self.market.coin_details(ctx, coin).await {
            Ok(details) => summary.push_str(&format_sentiment(&details)),
            Err(e) => tracing::warn!(coin, error = %e, "Sentiment data unavailable"),
        }

        Ok(summary)
    }
}

#[async_trait]
impl Command for RecommendCommand {
    fn name(&self) -> &str {
        "recommend"
    }

    fn aliases(&self) -> &[&str] {
        &["r", "recomendar"]
    }

    fn description(&self) -> &str {
        "Get a recommendation for a cryptocurrency"
    }

    async fn execute(&self, ctx: &RequestContext, args: &[String]) -> Result<String> {
        if args.is_empty() {
            return Ok(messages::RECOMMEND_USAGE.to_string());
        }

        let coin = args.join(" ").to_lowercase();
        let summary = self.market_summary(ctx, &coin).await?;
        tracing::debug!(coin = %coin, "Market summary:\n{}", summary);

        let prompt = prompts::recommendation_prompt(&coin, &summary);
        let recommendation = self
            .llm
            .completion(ctx, prompts::RECOMMENDATION_SYSTEM, &prompt)
            .await?;

        Ok(messages::with_disclaimer(&recommendation))
    }
}

/// Render a `/coins/markets` row as a titled bullet list.
pub fn format_snapshot(snapshot: &Map<String, Value>) -> String {
    let name = snapshot.get("name").and_then(Value::as_str).unwrap_or_default();
    let symbol = snapshot
        .get("symbol")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_uppercase();

    let mut out = format!("*{name} ({symbol})*\n\n");
    for (key, value) in snapshot {
        if let Some(line) = format_market_field(key, value) {
            out.push_str(&line);
        }
    }
    out
}

/// One `• Key Name: value` line, or `None` for fields that are left out (image URLs).
pub fn format_market_field(key: &str, value: &Value) -> Option<String> {
    let label = format_key_name(key);
    let rendered = match value {
        Value::Null => "N/A".to_string(),
        Value::Number(n) => {
            let v = n.as_f64().unwrap_or_default();
            if key.contains("percentage") {
                format!("{v:.2}%")
            } else if ["market_cap", "volume", "valuation"]
                .iter()
                .any(|k| key.contains(k))
            {
                format_large_number(v)
            } else if ["price", "ath", "atl", "high", "low"]
                .iter()
                .any(|k| key.contains(k))
            {
                format!("${v:.2}")
            } else {
                format!("{v:.0}")
            }
        }
        Value::String(s) if key.contains("date") => format_date(s),
        Value::String(_) if key.contains("image") => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(format!("• {label}: {rendered}\n"))
}

/// Sentiment vote shares and 7/14/30/60-day price changes from a `/coins/{id}` document.
/// Missing fields are skipped.
pub fn format_sentiment(details: &Value) -> String {
    let mut out = String::new();

    for key in SENTIMENT_KEYS {
        if let Some(v) = details.get(key).and_then(Value::as_f64) {
            let _ = writeln!(out, "• {}: {v:.2}%", format_key_name(key));
        }
    }

    if let Some(market_data) = details.get("market_data") {
        for key in HISTORICAL_CHANGE_KEYS {
            if let Some(v) = market_data.get(key).and_then(Value::as_f64) {
                let _ = writeln!(out, "• {}: {v:.2}%", format_key_name(key));
            }
        }
    }

    out
}

/// `price_change_24h` -> `Price Change 24h`
pub fn format_key_name(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_large_number(num: f64) -> String {
    if num >= 1e9 {
        format!("{:.2} billion", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2} million", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2} thousand", num / 1e3)
    } else {
        format!("{num:.2}")
    }
}

/// ISO-8601 timestamp -> `Jan 02, 2006 15:04:05`. Only the first 19 characters are read;
/// anything unparseable is returned as that prefix.
pub fn format_date(date: &str) -> String {
    let prefix = match date.char_indices().nth(19) {
        Some((idx, _)) => &date[..idx],
        None => date,
    };
    NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.format("%b %d, %Y %H:%M:%S").to_string())
        .unwrap_or_else(|_| prefix.to_string())
}
