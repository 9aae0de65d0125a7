/// Number of body characters embedded in the campaign image prompt
pub const IMAGE_PROMPT_BODY_CHARS: usize = 200;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text entry shared by every view.
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    text: String,
    cursor: usize,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole value and move the cursor to the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Whether a submit may go out now
    pub fn can_submit(&self, in_flight: bool) -> bool {
        !in_flight && !self.text.trim().is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

/// Instruction sent for the text phase of a campaign
pub fn email_copy_prompt(prompt: &str) -> String {
    format!(
        "Generate a complete email marketing campaign from this prompt: \"{}\". \
         Provide a compelling subject line and engaging body copy. \
         The body copy should be formatted in simple HTML paragraphs (<p> tags).",
        prompt
    )
}

/// Prompt for the campaign image, derived from the generated copy
pub fn campaign_image_prompt(subject: &str, body: &str) -> String {
    let excerpt: String = body.chars().take(IMAGE_PROMPT_BODY_CHARS).collect();
    format!(
        "Create a visually appealing marketing image for an email with the subject: \"{}\". \
         The email is about: {}...",
        subject, excerpt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit_requires_text() {
        let mut input = PromptInput::new();
        assert!(!input.can_submit(false));
        input.set("   ");
        assert!(!input.can_submit(false));
        input.set("a sunset");
        assert!(input.can_submit(false));
        assert!(!input.can_submit(true));
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut input = PromptInput::new();
        for c in "café".chars() {
            input.insert(c);
        }
        input.move_left();
        input.insert('x');
        assert_eq!(input.text(), "cafxé");
        input.move_end();
        input.backspace();
        assert_eq!(input.text(), "cafx");
        input.move_home();
        input.delete();
        assert_eq!(input.text(), "afx");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = PromptInput::new();
        input.set("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.delete();
        assert_eq!(input.text(), "ab");
        input.clear();
        input.backspace();
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_email_prompt_quotes_user_text() {
        let prompt = email_copy_prompt("50% off shoes");
        assert!(prompt.starts_with(
            "Generate a complete email marketing campaign from this prompt: \"50% off shoes\"."
        ));
        assert!(prompt.ends_with("(<p> tags)."));
    }

    #[test]
    fn test_image_prompt_truncates_body_by_chars() {
        let body = "é".repeat(300);
        let prompt = campaign_image_prompt("Sale", &body);
        assert!(prompt.contains("subject: \"Sale\""));
        let excerpt = prompt
            .split("The email is about: ")
            .nth(1)
            .unwrap()
            .trim_end_matches("...");
        assert_eq!(excerpt.chars().count(), IMAGE_PROMPT_BODY_CHARS);
    }

    #[test]
    fn test_image_prompt_keeps_short_body() {
        let prompt = campaign_image_prompt("S", "<p>Hurry in.</p>");
        assert!(prompt.ends_with("The email is about: <p>Hurry in.</p>..."));
    }
}
