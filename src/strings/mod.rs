//! # Strings Module
//!
//! Centralizes user-facing strings, prompts, and log text.
//! Keeps the fixed replies of the dispatch pipeline in one place so tests can compare against them.

pub mod help;
pub mod logs;
pub mod messages;
pub mod prompts;
