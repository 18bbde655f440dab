//! # Interface Layer
//!
//! User-facing command implementations built on the Domain traits.

pub mod commands;
