use super::ChatMessage;
use crate::ai::GenerationClient;
use crate::error::GenerationError;
use crate::prompt::PromptInput;

pub const GREETING: &str = "Hello! How can I help you today?";
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Everything one chat call needs, detached from the view so it can move into a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The conversation as displayed before this turn
    pub history: Vec<ChatMessage>,
    pub message: String,
}

impl ChatRequest {
    pub async fn send<C: GenerationClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<String, GenerationError> {
        client.complete_chat(&self.history, &self.message).await
    }
}

/// Chat view state: the conversation log, the input line, and the in-flight flag
#[derive(Debug, Clone)]
pub struct ChatView {
    pub input: PromptInput,
    messages: Vec<ChatMessage>,
    loading: bool,
    error: Option<String>,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            input: PromptInput::new(),
            messages: vec![ChatMessage::model(GREETING)],
            loading: false,
            error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record the user's message and hand back the request to send.
    ///
    /// Returns `None` when the input is blank or a reply is still pending.
    pub fn begin_send(&mut self) -> Option<ChatRequest> {
        if !self.input.can_submit(self.loading) {
            return None;
        }

        let message = self.input.text().to_string();
        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(message.clone()));
        self.input.clear();
        self.loading = true;
        self.error = None;

        Some(ChatRequest { history, message })
    }

    pub fn finish(&mut self, result: Result<String, GenerationError>) {
        self.loading = false;
        match result {
            Ok(reply) => self.messages.push(ChatMessage::model(reply)),
            Err(e) => {
                self.error = Some(format!("Failed to get response: {}", e));
                self.messages.push(ChatMessage::model(ERROR_REPLY));
            }
        }
    }
}
