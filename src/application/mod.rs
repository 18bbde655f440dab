//! # Application Layer
//!
//! Contains the core dispatch logic of the bot: sanitization, tokenization, the command
//! registry, the middleware pipeline, and the router that ties them to a transport.

pub mod identity;
pub mod logging;
pub mod middleware;
pub mod parsing;
pub mod registry;
pub mod router;
pub mod sanitize;
