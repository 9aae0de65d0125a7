use thiserror::Error;

/// Errors surfaced by a generation call.
///
/// Every failure reaches the caller on the first attempt; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Network or service failure, or the provider answered without a usable payload.
    #[error("{0}")]
    Provider(String),

    /// Structured output could not be parsed into a subject/body pair.
    /// `detail` goes to the log only.
    #[error("The AI returned an invalid format. Please try again.")]
    Format { detail: String },
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_hides_detail() {
        let err = GenerationError::Format {
            detail: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The AI returned an invalid format. Please try again."
        );
    }

    #[test]
    fn test_provider_error_shows_message() {
        let err = GenerationError::Provider("Gemini API error 503: overloaded".to_string());
        assert_eq!(err.to_string(), "Gemini API error 503: overloaded");
    }
}
