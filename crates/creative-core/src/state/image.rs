use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::error::GenerationError;
use crate::image::{describe_size, save_image};
use crate::prompt::PromptInput;

/// Image view state. The prompt is kept after submit so it can be reused.
#[derive(Debug, Clone, Default)]
pub struct ImageView {
    pub input: PromptInput,
    loading: bool,
    error: Option<String>,
    image: Option<String>,
    image_size: Option<String>,
    generated_for: String,
}

impl ImageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The current image as a data URI
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Decoded size of the current image, worked out once when it arrives
    pub fn image_size(&self) -> Option<&str> {
        self.image_size.as_deref()
    }

    /// Prompt that produced the current image
    pub fn generated_for(&self) -> &str {
        &self.generated_for
    }

    /// Clear the previous result and return the prompt to generate from.
    ///
    /// Returns `None` when the input is blank or a request is still pending.
    pub fn begin_generate(&mut self) -> Option<String> {
        if !self.input.can_submit(self.loading) {
            return None;
        }

        let prompt = self.input.text().to_string();
        self.loading = true;
        self.error = None;
        self.image = None;
        self.image_size = None;
        self.generated_for = prompt.clone();
        Some(prompt)
    }

    pub fn finish(&mut self, result: Result<String, GenerationError>) {
        self.loading = false;
        match result {
            Ok(uri) => {
                self.image_size = describe_size(&uri);
                self.image = Some(uri);
            }
            Err(e) => self.error = Some(format!("Failed to generate image: {}", e)),
        }
    }

    /// Write the current image into `dir`, named after its prompt
    pub fn download(&self, dir: &Path) -> Result<PathBuf> {
        let uri = self
            .image
            .as_deref()
            .ok_or_else(|| anyhow!("No image to download"))?;
        save_image(dir, &self.generated_for, uri)
    }

    /// Surface a failure that happened outside the provider call (e.g. a download)
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
