//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, LlmProvider, MarketDataProvider).

pub mod coingecko;
pub mod console;
pub mod huggingface;
pub mod matrix;
