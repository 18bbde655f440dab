//! # Messages
//!
//! Constant strings and format functions for user-facing replies.
//! Soft failures (unknown command, rate limit, timeout) and sanitizer warnings are plain replies, not errors.

pub const USAGE_HINT: &str = "Send a command like '/price Bitcoin' or ask a question.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Type /help for a list of commands.";
pub const FALLBACK_REPLY: &str = "I don't understand that. Try typing /help for assistance.";

pub const RATE_LIMITED: &str = "You're sending messages too quickly. Please wait a moment.";
pub const TIMED_OUT: &str = "Request timed out. Please try again later.";
pub const PROCESSING_ERROR: &str = "Sorry, I encountered an error while processing your request.";

pub const SCRIPT_WARNING: &str = "⚠️ Suspicious script detected in input";
pub const SQL_WARNING: &str = "⚠️ Suspicious SQL syntax detected in input";
pub const TRUNCATION_MARKER: &str = "... (truncated)";

pub const PRICE_USAGE: &str = "Please specify a cryptocurrency (e.g., /price Bitcoin)";
pub const RECOMMEND_USAGE: &str = "Please specify a cryptocurrency (e.g., /recommend Bitcoin)";
pub const DISCLAIMER: &str = "*This is not financial advice. Always do your own research.*";
pub const AI_UNPARSEABLE: &str = "I couldn't understand the response from the AI service.";

pub fn price_quote(coin: &str, price: f64, currency: &str) -> String {
    format!("{coin} -> {price:.4} {}", currency.to_uppercase())
}

pub fn with_disclaimer(recommendation: &str) -> String {
    format!("{recommendation}\n\n{DISCLAIMER}")
}
