use async_trait::async_trait;

use crate::error::GenerationError;
use crate::state::{ChatMessage, EmailCopy};

pub mod gemini;
pub mod structured;

#[cfg(test)]
pub(crate) mod mock;

pub use gemini::GeminiClient;
pub use structured::{parse_email_copy, strip_code_fence};

/// One request/response round trip per call against a generative-AI provider.
///
/// Implementations hold no conversational state; callers pass everything the
/// provider needs on every call.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send `history` followed by `next_message` and return the reply text.
    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        next_message: &str,
    ) -> Result<String, GenerationError>;

    /// Generate exactly one image and return it as a `data:` URI.
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Generate a subject line and HTML body for an email campaign.
    async fn generate_email_copy(&self, prompt: &str) -> Result<EmailCopy, GenerationError>;
}
