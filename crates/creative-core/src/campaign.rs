//! Two-phase email campaign generation: copy first, then an image drawn from the copy.

use tracing::{info, warn};

use crate::ai::GenerationClient;
use crate::error::GenerationError;
use crate::prompt::campaign_image_prompt;
use crate::state::EmailCampaign;

/// Progress published while a campaign is generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignUpdate {
    /// Copy is ready; the image call is outstanding (`image` is `None`)
    TextReady(EmailCampaign),
    Completed(EmailCampaign),
    Failed(GenerationError),
}

/// Generate a campaign for `prompt`, publishing each step through `publish`.
///
/// The image call only starts once the copy is back. Exactly one terminal update
/// (`Completed` or `Failed`) is published, and the same outcome is returned.
pub async fn run_campaign<C, F>(
    client: &C,
    prompt: &str,
    mut publish: F,
) -> Result<EmailCampaign, GenerationError>
where
    C: GenerationClient + ?Sized,
    F: FnMut(CampaignUpdate) + Send,
{
    let result = generate(client, prompt, &mut publish).await;

    match &result {
        Ok(campaign) => {
            info!(subject = %campaign.subject, "campaign generated");
            publish(CampaignUpdate::Completed(campaign.clone()));
        }
        Err(e) => {
            warn!(error = %e, "campaign generation failed");
            publish(CampaignUpdate::Failed(e.clone()));
        }
    }
    result
}

async fn generate<C, F>(
    client: &C,
    prompt: &str,
    publish: &mut F,
) -> Result<EmailCampaign, GenerationError>
where
    C: GenerationClient + ?Sized,
    F: FnMut(CampaignUpdate) + Send,
{
    let copy = client.generate_email_copy(prompt).await?;
    let mut campaign = EmailCampaign::from(copy);
    publish(CampaignUpdate::TextReady(campaign.clone()));

    let image_prompt = campaign_image_prompt(&campaign.subject, &campaign.body);
    campaign.image = Some(client.generate_image(&image_prompt).await?);
    Ok(campaign)
}
