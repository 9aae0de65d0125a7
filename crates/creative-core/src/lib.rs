pub mod ai;
pub mod campaign;
pub mod config;
pub mod error;
pub mod image;
pub mod prompt;
pub mod state;

// Re-export main types for convenience
pub use ai::{GeminiClient, GenerationClient};
pub use campaign::{run_campaign, CampaignUpdate};
pub use config::Config;
pub use error::GenerationError;
pub use prompt::PromptInput;
pub use state::{ChatMessage, ChatRole, EmailCampaign, EmailCopy};
