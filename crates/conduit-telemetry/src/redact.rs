use std::borrow::Cow;

use conduit_config::RedactionPolicy;

/// Apply the configured redaction policy to error detail bound for logs
pub fn redact(policy: RedactionPolicy, detail: &str) -> Cow<'_, str> {
    match policy {
        RedactionPolicy::None => Cow::Borrowed(detail),
        RedactionPolicy::Detail => Cow::Owned(format!("[redacted {} bytes]", detail.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_passes_detail_through() {
        let out = redact(RedactionPolicy::None, "key sk-123 not found");
        assert!(matches!(out, Cow::Borrowed("key sk-123 not found")));
    }

    #[test]
    fn detail_keeps_only_length() {
        let out = redact(RedactionPolicy::Detail, "key sk-123 not found");
        assert_eq!(out, "[redacted 20 bytes]");
        assert!(!out.contains("sk-123"));
    }
}
