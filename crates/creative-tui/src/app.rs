use std::path::PathBuf;
use std::sync::Arc;

use creative_core::campaign::run_campaign;
use creative_core::state::{CampaignView, ChatView, ImageView};
use creative_core::{GenerationClient, PromptInput};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Email,
    Image,
    Chat,
}

impl Tab {
    pub fn all() -> [Tab; 3] {
        [Tab::Email, Tab::Image, Tab::Chat]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Email => "Email Campaign",
            Tab::Image => "Image Gen",
            Tab::Chat => "Chatbot",
        }
    }

    pub fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        let tabs = Tab::all();
        tabs[(self.index() + 1) % tabs.len()]
    }

    pub fn prev(&self) -> Tab {
        let tabs = Tab::all();
        tabs[(self.index() + tabs.len() - 1) % tabs.len()]
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub tab: Tab,

    // Per-view state
    pub chat: ChatView,
    pub image: ImageView,
    pub campaign: CampaignView,

    // Chat scrolling
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Campaign preview scrolling
    pub campaign_scroll: u16,

    // Status line message, e.g. where a download went
    pub notice: Option<String>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Provider and result channel
    client: Arc<dyn GenerationClient>,
    events: UnboundedSender<AppEvent>,
    download_dir: PathBuf,
}

impl App {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        events: UnboundedSender<AppEvent>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            should_quit: false,
            tab: Tab::Email,

            chat: ChatView::new(),
            image: ImageView::new(),
            campaign: CampaignView::new(),

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            campaign_scroll: 0,

            notice: None,
            animation_frame: 0,

            client,
            events,
            download_dir,
        }
    }

    /// Input line of the active view
    pub fn input_mut(&mut self) -> &mut PromptInput {
        match self.tab {
            Tab::Email => &mut self.campaign.input,
            Tab::Image => &mut self.image.input,
            Tab::Chat => &mut self.chat.input,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.tab {
            Tab::Email => self.campaign.is_loading(),
            Tab::Image => self.image.is_loading(),
            Tab::Chat => self.chat.is_loading(),
        }
    }

    /// Submit the active view's prompt. Does nothing if the view refuses.
    pub fn submit(&mut self) {
        self.notice = None;
        match self.tab {
            Tab::Email => self.submit_campaign(),
            Tab::Image => self.submit_image(),
            Tab::Chat => self.submit_chat(),
        }
    }

    fn submit_chat(&mut self) {
        let Some(request) = self.chat.begin_send() else {
            return;
        };
        debug!(turns = request.history.len(), "chat message submitted");
        self.scroll_chat_to_bottom();

        let client = Arc::clone(&self.client);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = request.send(client.as_ref()).await;
            let _ = tx.send(AppEvent::ChatReply(result));
        });
    }

    fn submit_image(&mut self) {
        let Some(prompt) = self.image.begin_generate() else {
            return;
        };
        debug!(prompt_len = prompt.len(), "image generation submitted");

        let client = Arc::clone(&self.client);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = client.generate_image(&prompt).await;
            let _ = tx.send(AppEvent::ImageReady(result));
        });
    }

    fn submit_campaign(&mut self) {
        let Some(prompt) = self.campaign.begin_generate() else {
            return;
        };
        debug!(prompt_len = prompt.len(), "campaign generation submitted");
        self.campaign_scroll = 0;

        let client = Arc::clone(&self.client);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let _ = run_campaign(client.as_ref(), &prompt, |update| {
                let _ = tx.send(AppEvent::Campaign(update));
            })
            .await;
        });
    }

    /// Save the generated image to the download directory
    pub fn download_image(&mut self) {
        if self.tab != Tab::Image || self.image.image().is_none() {
            return;
        }
        match self.image.download(&self.download_dir) {
            Ok(path) => self.notice = Some(format!("Saved {}", path.display())),
            Err(e) => {
                warn!(error = %e, "image download failed");
                self.image.set_error(format!("Failed to save image: {}", e));
            }
        }
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.notice = None;
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
        self.notice = None;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.is_loading() || self.image.is_loading() || self.campaign.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        match self.tab {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(3),
            Tab::Email => self.campaign_scroll = self.campaign_scroll.saturating_sub(3),
            Tab::Image => {}
        }
    }

    pub fn scroll_down(&mut self) {
        match self.tab {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_add(3),
            Tab::Email => self.campaign_scroll = self.campaign_scroll.saturating_add(3),
            Tab::Image => {}
        }
    }

    /// Scroll chat to bottom so the newest message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        // The log only grows, so count in usize and clamp at the end
        let mut total_lines: usize = 0;

        for msg in self.chat.messages() {
            total_lines = total_lines.saturating_add(1); // Role line ("You:" or "AI:")
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.chat.is_loading() {
            total_lines = total_lines.saturating_add(2); // "AI:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height as usize
        } else {
            20
        };

        self.chat_scroll =
            u16::try_from(total_lines.saturating_sub(visible_height)).unwrap_or(u16::MAX);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use stub::StubClient;
    use tokio::sync::mpsc;

    /// Minimal provider stand-in for exercising the app without a network
    pub(crate) mod stub {
        use creative_core::{ChatMessage, EmailCopy, GenerationClient, GenerationError};
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        pub(crate) struct StubClient {
            pub(crate) calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl GenerationClient for StubClient {
            async fn complete_chat(
                &self,
                history: &[ChatMessage],
                _next_message: &str,
            ) -> Result<String, GenerationError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("seen {} messages", history.len()))
            }

            async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok("data:image/jpeg;base64,AAEC".to_string())
            }

            async fn generate_email_copy(
                &self,
                _prompt: &str,
            ) -> Result<EmailCopy, GenerationError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(EmailCopy {
                    subject: "Half Off All Shoes!".to_string(),
                    body: "<p>Hurry in.</p>".to_string(),
                })
            }
        }
    }

    pub(crate) fn test_app(
        download_dir: PathBuf,
    ) -> (App, Arc<StubClient>, mpsc::UnboundedReceiver<AppEvent>) {
        let client = Arc::new(StubClient::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(client.clone(), tx, download_dir);
        (app, client, rx)
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Email.next(), Tab::Image);
        assert_eq!(Tab::Chat.next(), Tab::Email);
        assert_eq!(Tab::Email.prev(), Tab::Chat);
    }

    #[tokio::test]
    async fn test_campaign_results_arrive_as_events() {
        let (mut app, client, mut rx) = test_app(PathBuf::from("."));
        app.campaign.input.set("50% off shoes");
        app.submit();
        // Second submit while pending is refused
        app.submit();

        let mut updates = Vec::new();
        while let Some(AppEvent::Campaign(update)) = rx.recv().await {
            let done = matches!(update, creative_core::CampaignUpdate::Completed(_));
            app.campaign.apply(update.clone());
            updates.push(update);
            if done {
                break;
            }
        }

        assert_eq!(updates.len(), 2);
        assert_eq!(client.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        let campaign = app.campaign.campaign().unwrap();
        assert_eq!(campaign.image.as_deref(), Some("data:image/jpeg;base64,AAEC"));
    }

    #[tokio::test]
    async fn test_long_chat_scroll_clamps_instead_of_overflowing() {
        let (mut app, _client, _rx) = test_app(PathBuf::from("."));
        app.chat_width = 80;
        app.chat_height = 20;

        let reply = vec!["a line of model output"; 60].join("\n");
        for i in 0..1100 {
            app.chat.input.set(format!("question {}", i));
            app.chat.begin_send().unwrap();
            app.chat.finish(Ok(reply.clone()));
        }

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX);
    }

    #[tokio::test]
    async fn test_short_chat_scrolls_to_last_line() {
        let (mut app, _client, _rx) = test_app(PathBuf::from("."));
        app.chat_width = 80;
        app.chat_height = 2;

        // Greeting: role line, one text line, blank line
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 1);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _client, mut rx) = test_app(dir.path().to_path_buf());
        app.tab = Tab::Image;
        app.image.input.set("red fox");
        app.submit();

        if let Some(AppEvent::ImageReady(result)) = rx.recv().await {
            app.image.finish(result);
        }
        app.download_image();

        assert!(dir.path().join("red_fox.jpeg").exists());
        assert!(app.notice.as_deref().unwrap().starts_with("Saved"));
    }
}
