use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::GenerationError;
use crate::state::EmailCopy;

fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```(?:json)?[ \t]*\n?").expect("valid regex"))
}

fn closing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n?```$").expect("valid regex"))
}

/// Remove a markdown code fence wrapped around structured output.
///
/// The provider is asked for bare JSON but sometimes answers with
/// ```` ```json ... ``` ````. Unfenced text passes through trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = opening_fence()
        .find(trimmed)
        .map(|m| m.end())
        .unwrap_or(0);
    let rest = &trimmed[start..];
    let end = closing_fence()
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Parse the text-phase response into an [`EmailCopy`].
///
/// Only checks that `subject` and `body` exist and are strings. Anything else in
/// the object is ignored.
pub fn parse_email_copy(raw: &str) -> Result<EmailCopy, GenerationError> {
    let clean = strip_code_fence(raw);

    let parsed: Value = serde_json::from_str(clean).map_err(|e| {
        warn!(error = %e, response = clean, "failed to parse structured response");
        GenerationError::Format {
            detail: e.to_string(),
        }
    })?;

    match (parsed.get("subject"), parsed.get("body")) {
        (Some(Value::String(subject)), Some(Value::String(body))) => Ok(EmailCopy {
            subject: subject.clone(),
            body: body.clone(),
        }),
        _ => {
            warn!(response = clean, "structured response lacks string subject/body");
            Err(GenerationError::Format {
                detail: "Invalid JSON structure in response.".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = "```json\n{\"subject\":\"S\",\"body\":\"B\"}\n```";
        let bare = "{\"subject\":\"S\",\"body\":\"B\"}";
        let expected = EmailCopy {
            subject: "S".to_string(),
            body: "B".to_string(),
        };
        assert_eq!(parse_email_copy(fenced).unwrap(), expected);
        assert_eq!(parse_email_copy(bare).unwrap(), expected);
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_strip_fence_surrounding_whitespace() {
        assert_eq!(strip_code_fence("  \n```json\n{\"a\":1}\n```\n  "), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_missing_body_is_format_error() {
        let err = parse_email_copy(r#"{"subject":"S"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Format { .. }));
    }

    #[test]
    fn test_non_string_field_is_format_error() {
        let err = parse_email_copy(r#"{"subject":"S","body":42}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Format { .. }));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = parse_email_copy("Sure! Here is your email:").unwrap_err();
        assert!(matches!(err, GenerationError::Format { .. }));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let copy = parse_email_copy(r#"{"subject":"S","body":"B","preheader":"P"}"#).unwrap();
        assert_eq!(copy.body, "B");
    }
}
