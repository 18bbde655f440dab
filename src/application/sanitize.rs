//! # Input Sanitizer
//!
//! Pattern-based cleanup applied to every inbound message before it reaches command logic.
//! This is heuristic filtering (control characters, script tags, SQL-shaped text, symbol
//! homoglyphs), not a security boundary.

use regex::Regex;
use std::sync::LazyLock;

use crate::strings::messages::{SCRIPT_WARNING, SQL_WARNING, TRUNCATION_MARKER};

/// Longest accepted input, in characters, before truncation.
pub const MAX_INPUT_CHARS: usize = 1000;

/// SQL-shaped text shorter than this is let through ("drop from" in a chat is usually harmless).
const SQL_MIN_CHARS: usize = 15;

static SCRIPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*script\b[^>]*>(.*?)<\s*/\s*script\s*>").expect("script pattern is valid")
});

static SQL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(select|insert|update|delete|drop|alter|create|truncate)\b.*\b(from|into|table|database|schema)\b",
    )
    .expect("sql pattern is valid")
});

// Other symbols and unassigned code points
static HOMOGLYPH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{So}|\p{Cn}").expect("homoglyph pattern is valid"));

/// Clean a whole inbound message.
///
/// Returns a fixed warning instead of the text when a script tag or SQL-shaped input is
/// detected, and bounds the length to [`MAX_INPUT_CHARS`] plus a truncation marker.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_input(input: &str) -> String {
    let stripped = strip_control(input.trim());
    let sanitized = stripped.trim();

    if SCRIPT_PATTERN.is_match(sanitized) {
        return SCRIPT_WARNING.to_string();
    }

    if SQL_PATTERN.is_match(sanitized) && sanitized.chars().count() > SQL_MIN_CHARS {
        return SQL_WARNING.to_string();
    }

    truncate(sanitized)
}

/// Normalize a command name and its arguments.
///
/// The name is trimmed and lower-cased; each argument is trimmed and loses control
/// characters and symbol-like code points.
pub fn sanitize_command(name: &str, args: &[String]) -> (String, Vec<String>) {
    let name = name.trim().to_lowercase();
    let args = args
        .iter()
        .map(|arg| {
            let arg = strip_control(arg.trim());
            HOMOGLYPH_PATTERN.replace_all(&arg, "").into_owned()
        })
        .collect();
    (name, args)
}

/// Normalize a transport-level sender id into a rate-limit key.
///
/// Keeps ASCII alphanumerics and the punctuation allowed in Matrix ids (`@ : . - _ = / +`).
/// Phone-style ids (`123@s.whatsapp.net`) are cut at the `@`; ids that start with `@`
/// (Matrix) are kept whole, server part included.
pub fn sanitize_user_id(user_id: &str) -> String {
    let cleaned: String = user_id
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '@' | ':' | '.' | '-' | '_' | '=' | '/' | '+')
        })
        .collect();

    match cleaned.find('@') {
        Some(idx) if idx > 0 => cleaned[..idx].to_string(),
        _ => cleaned,
    }
}

fn strip_control(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_control()).collect()
}

fn truncate(text: &str) -> String {
    if let Some(body) = text.strip_suffix(TRUNCATION_MARKER)
        && body.chars().count() == MAX_INPUT_CHARS
    {
        return text.to_string();
    }

    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => format!("{}{}", &text[..idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_strips_control_characters() {
        assert_eq!(sanitize_input("  hello\u{0}\u{7}world \n"), "helloworld");
        assert_eq!(sanitize_input("a\tb"), "ab");
        assert_eq!(sanitize_input("a \u{1}"), "a");
    }

    #[test]
    fn test_script_tag_is_replaced_by_warning() {
        assert_eq!(sanitize_input("<script>alert(1)</script>"), SCRIPT_WARNING);
        assert_eq!(
            sanitize_input("hi <SCRIPT type=\"text/javascript\">x</ script > there"),
            SCRIPT_WARNING
        );
        assert_eq!(sanitize_input("a <script>alert(1)</script> b"), SCRIPT_WARNING);
    }

    #[test]
    fn test_sql_pattern_needs_minimum_length() {
        assert_eq!(sanitize_input("SELECT * FROM users WHERE 1=1"), SQL_WARNING);
        assert_eq!(sanitize_input("drop table x"), "drop table x");
        assert_eq!(sanitize_input("please delete it from the list"), SQL_WARNING);
        assert_eq!(
            sanitize_input("what is the price of bitcoin today"),
            "what is the price of bitcoin today"
        );
    }

    #[test]
    fn test_long_input_is_truncated() {
        let input = "x".repeat(1500);
        let out = sanitize_input(&input);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS + TRUNCATION_MARKER.chars().count());
        assert_eq!(&out[..MAX_INPUT_CHARS], "x".repeat(MAX_INPUT_CHARS));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let input = "é".repeat(1200);
        let out = sanitize_input(&input);
        assert!(out.starts_with(&"é".repeat(MAX_INPUT_CHARS)));
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_input_at_limit_is_untouched() {
        let input = "y".repeat(MAX_INPUT_CHARS);
        assert_eq!(sanitize_input(&input), input);
    }

    #[test]
    fn test_sanitize_input_is_a_fixed_point() {
        let samples = [
            String::new(),
            "  /price btc in usd ".to_string(),
            "a \u{1}".to_string(),
            "<script>alert(1)</script>".to_string(),
            "SELECT name FROM accounts".to_string(),
            "z".repeat(1500),
            format!("{} tail", "w ".repeat(600)),
            "¿Cuál es el precio de ethereum? 🚀".to_string(),
        ];
        for sample in samples {
            let once = sanitize_input(&sample);
            assert_eq!(sanitize_input(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_sanitize_command() {
        let args = vec![
            " btc ".to_string(),
            "in\u{7}".to_string(),
            "us🚀d".to_string(),
            "€uro".to_string(),
        ];
        let (name, args) = sanitize_command("  PRICE ", &args);
        assert_eq!(name, "price");
        // Currency symbols (Sc) are not in the filtered categories
        assert_eq!(args, vec!["btc", "in", "usd", "€uro"]);
    }

    #[test]
    fn test_sanitize_user_id() {
        assert_eq!(sanitize_user_id("5491122334455@s.whatsapp.net"), "5491122334455");
        assert_eq!(sanitize_user_id("@alice:matrix.org"), "@alice:matrix.org");
        assert_ne!(
            sanitize_user_id("@bob:example.org"),
            sanitize_user_id("@bo:bexample.org")
        );
        assert_eq!(sanitize_user_id("bob <script>"), "bobscript");
        assert_eq!(sanitize_user_id(""), "");
    }
}
