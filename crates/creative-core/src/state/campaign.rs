use super::EmailCampaign;
use crate::campaign::CampaignUpdate;
use crate::image::describe_size;
use crate::prompt::PromptInput;

/// Where the campaign view is in the two-phase flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CampaignPhase {
    #[default]
    Idle,
    TextPending,
    /// Copy is shown while the image is still being generated
    ImagePending(EmailCampaign),
    Done(EmailCampaign),
    /// Holds the user-facing message. Any partial campaign is dropped.
    Failed(String),
}

impl CampaignPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, CampaignPhase::TextPending | CampaignPhase::ImagePending(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CampaignView {
    pub input: PromptInput,
    phase: CampaignPhase,
    image_size: Option<String>,
}

impl CampaignView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &CampaignPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_pending()
    }

    /// The campaign to render, partial or complete
    pub fn campaign(&self) -> Option<&EmailCampaign> {
        match &self.phase {
            CampaignPhase::ImagePending(c) | CampaignPhase::Done(c) => Some(c),
            _ => None,
        }
    }

    /// Decoded size of the finished campaign image
    pub fn image_size(&self) -> Option<&str> {
        self.image_size.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            CampaignPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Reset any previous result and return the prompt to run.
    ///
    /// Returns `None` when the input is blank or a run is still pending.
    pub fn begin_generate(&mut self) -> Option<String> {
        if !self.input.can_submit(self.phase.is_pending()) {
            return None;
        }
        self.phase = CampaignPhase::TextPending;
        self.image_size = None;
        Some(self.input.text().to_string())
    }

    /// Apply progress from the running orchestration. Updates that arrive when
    /// nothing is pending are ignored.
    pub fn apply(&mut self, update: CampaignUpdate) {
        if !self.phase.is_pending() {
            return;
        }

        self.phase = match update {
            CampaignUpdate::TextReady(campaign) => match self.phase {
                CampaignPhase::TextPending => CampaignPhase::ImagePending(campaign),
                _ => return,
            },
            CampaignUpdate::Completed(campaign) => {
                self.image_size = campaign.image.as_deref().and_then(describe_size);
                CampaignPhase::Done(campaign)
            }
            CampaignUpdate::Failed(e) => {
                CampaignPhase::Failed(format!("Failed to generate campaign: {}", e))
            }
        };
    }
}
