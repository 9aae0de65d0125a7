//! UI-agnostic application state types
//!
//! This module contains the data model and the per-view state machines. None of it
//! depends on a UI framework; the terminal front-end only renders what lives here.

use serde::{Deserialize, Serialize};

pub mod campaign;
pub mod chat;
pub mod image;

pub use campaign::{CampaignPhase, CampaignView};
pub use chat::{ChatRequest, ChatView};
pub use image::ImageView;

/// A chat message in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// Subject and body returned by the structured text call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCopy {
    pub subject: String,
    pub body: String,
}

/// The subject/body/image triple produced by the campaign workflow.
/// `image` is `None` while the image call is still outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub subject: String,
    pub body: String,
    pub image: Option<String>,
}

impl From<EmailCopy> for EmailCampaign {
    fn from(copy: EmailCopy) -> Self {
        Self {
            subject: copy.subject,
            body: copy.body,
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }

    #[test]
    fn test_campaign_from_copy_has_no_image() {
        let campaign = EmailCampaign::from(EmailCopy {
            subject: "S".to_string(),
            body: "B".to_string(),
        });
        assert_eq!(campaign.image, None);
        assert_eq!(campaign.subject, "S");
    }
}
