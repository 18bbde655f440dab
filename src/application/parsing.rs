//! # Parsing Utils
//!
//! Splits raw message text into a command token and its arguments.

/// Prefix marking the first token as a command (`/price`).
pub const COMMAND_PREFIX: char = '/';

/// Split `text` into whitespace-delimited tokens.
///
/// A `"` toggles quoting: while open, whitespace is kept inside the current token. Quote
/// characters never appear in the output and an unterminated quote closes at end of input.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Returns the bare command name if `token` carries the command prefix.
pub fn strip_command_prefix(token: &str) -> Option<&str> {
    token.strip_prefix(COMMAND_PREFIX)
}
