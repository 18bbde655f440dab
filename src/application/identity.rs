//! # Identity Resolution
//!
//! Derives the rate-limit key for a request.

use crate::application::sanitize::sanitize_user_id;
use crate::domain::types::{HINT_KEYS, RequestContext};

/// Shared bucket for callers that carry no identifying information at all.
pub const ANONYMOUS_IDENTITY: &str = "default-user";

/// Resolve the identity used to bucket a request.
///
/// Order: sanitized sender id; otherwise `anon-<hex>` built from the secondary hints
/// (`remote_addr`, `user_agent`, `session_id`); otherwise [`ANONYMOUS_IDENTITY`].
pub fn resolve_identity(ctx: &RequestContext) -> String {
    if let Some(sender) = ctx.sender()
        && !sender.is_empty()
    {
        let sanitized = sanitize_user_id(sender);
        if !sanitized.is_empty() {
            return sanitized;
        }
    }

    let values: Vec<&str> = HINT_KEYS
        .iter()
        .filter_map(|key| ctx.hint(key))
        .filter(|value| !value.is_empty())
        .collect();

    if values.is_empty() {
        return ANONYMOUS_IDENTITY.to_string();
    }

    let joined = values.join("-");
    let hex: String = joined.bytes().map(|b| format!("{b:02x}")).collect();
    format!("anon-{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wins() {
        let ctx = RequestContext::new()
            .with_sender("5491122334455@s.whatsapp.net")
            .with_hint("remote_addr", "10.0.0.1");
        assert_eq!(resolve_identity(&ctx), "5491122334455");
    }

    #[test]
    fn test_hints_fallback_is_hex_encoded_in_fixed_order() {
        let ctx = RequestContext::new()
            .with_hint("session_id", "s")
            .with_hint("remote_addr", "ip");
        // "ip-s"
        assert_eq!(resolve_identity(&ctx), "anon-69702d73");
    }

    #[test]
    fn test_empty_sender_falls_through() {
        let ctx = RequestContext::new().with_sender("").with_hint("user_agent", "A");
        assert_eq!(resolve_identity(&ctx), "anon-41");
    }

    #[test]
    fn test_sender_with_only_symbols_falls_through() {
        let ctx = RequestContext::new().with_sender("<<>>");
        assert_eq!(resolve_identity(&ctx), ANONYMOUS_IDENTITY);
    }

    #[test]
    fn test_anonymous_fallback() {
        assert_eq!(resolve_identity(&RequestContext::new()), ANONYMOUS_IDENTITY);
        let blank_hints = RequestContext::new().with_hint("remote_addr", "");
        assert_eq!(resolve_identity(&blank_hints), ANONYMOUS_IDENTITY);
    }
}
