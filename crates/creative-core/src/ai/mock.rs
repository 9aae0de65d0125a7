use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::GenerationClient;
use crate::error::GenerationError;
use crate::state::{ChatMessage, EmailCopy};

/// A call received by [`MockClient`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Chat {
        history: Vec<ChatMessage>,
        next_message: String,
    },
    Image {
        prompt: String,
    },
    EmailCopy {
        prompt: String,
    },
}

/// Scripted client for tests: each method pops its next queued reply.
#[derive(Default)]
pub(crate) struct MockClient {
    chat_replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    image_replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    copy_replies: Mutex<VecDeque<Result<EmailCopy, GenerationError>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_chat(self, reply: Result<String, GenerationError>) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn with_image(self, reply: Result<String, GenerationError>) -> Self {
        self.image_replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn with_copy(self, reply: Result<EmailCopy, GenerationError>) -> Self {
        self.copy_replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn unscripted() -> GenerationError {
        GenerationError::Provider("no scripted reply".to_string())
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        next_message: &str,
    ) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(Call::Chat {
            history: history.to_vec(),
            next_message: next_message.to_string(),
        });
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(Call::Image {
            prompt: prompt.to_string(),
        });
        self.image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted()))
    }

    async fn generate_email_copy(&self, prompt: &str) -> Result<EmailCopy, GenerationError> {
        self.calls.lock().unwrap().push(Call::EmailCopy {
            prompt: prompt.to_string(),
        });
        self.copy_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted()))
    }
}
