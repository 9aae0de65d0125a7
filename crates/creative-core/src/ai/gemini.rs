use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::structured::parse_email_copy;
use super::GenerationClient;
use crate::config::Config;
use crate::error::GenerationError;
use crate::image::data_uri;
use crate::prompt::email_copy_prompt;
use crate::state::{ChatMessage, ChatRole, EmailCopy};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
pub const IMAGE_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Serialize, PartialEq)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn new(role: ChatRole, text: &str) -> Self {
        Self {
            role: role.as_str(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

impl PredictResponse {
    fn first_image(&self) -> Option<&str> {
        self.predictions
            .iter()
            .find_map(|p| p.bytes_base64_encoded.as_deref())
            .filter(|b| !b.is_empty())
    }
}

fn chat_request(history: &[ChatMessage], next_message: &str) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content::new(msg.role, &msg.text))
        .collect();
    contents.push(Content::new(ChatRole::User, next_message));

    GenerateContentRequest {
        contents,
        generation_config: None,
    }
}

fn email_copy_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": {
                "type": "STRING",
                "description": "A compelling and short subject line for the email."
            },
            "body": {
                "type": "STRING",
                "description": "The full body of the email, formatted with HTML <p> tags for paragraphs."
            }
        },
        "required": ["subject", "body"]
    })
}

fn email_copy_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::new(ChatRole::User, &email_copy_prompt(prompt))],
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: email_copy_schema(),
        }),
    }
}

fn image_request(prompt: &str) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: prompt.to_string(),
        }],
        parameters: PredictParameters {
            sample_count: 1,
            aspect_ratio: IMAGE_ASPECT_RATIO,
            output_options: OutputOptions {
                mime_type: IMAGE_MIME_TYPE,
            },
        },
    }
}

/// Gemini REST client. Built once at startup and shared behind an `Arc`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chat_model: config.chat_model().to_string(),
            image_model: config.image_model().to_string(),
        }
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> Result<R, GenerationError> {
        let url = format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            method
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        next_message: &str,
    ) -> Result<String, GenerationError> {
        debug!(model = %self.chat_model, turns = history.len(), "sending chat message");
        let request = chat_request(history, next_message);
        let response: GenerateContentResponse =
            self.post(&self.chat_model, "generateContent", &request).await?;

        response
            .text()
            .ok_or_else(|| GenerationError::Provider("The model returned an empty reply.".to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(model = %self.image_model, prompt_len = prompt.len(), "generating image");
        let request = image_request(prompt);
        let response: PredictResponse = self.post(&self.image_model, "predict", &request).await?;

        match response.first_image() {
            Some(bytes) => Ok(data_uri(IMAGE_MIME_TYPE, bytes)),
            None => Err(GenerationError::Provider(
                "Image generation failed or returned no images.".to_string(),
            )),
        }
    }

    async fn generate_email_copy(&self, prompt: &str) -> Result<EmailCopy, GenerationError> {
        info!(model = %self.chat_model, prompt_len = prompt.len(), "generating email copy");
        let request = email_copy_request(prompt);
        let response: GenerateContentResponse =
            self.post(&self.chat_model, "generateContent", &request).await?;

        let raw = response
            .text()
            .ok_or_else(|| GenerationError::Provider("The model returned an empty reply.".to_string()))?;
        parse_email_copy(&raw)
    }
}
