//! One-line chat prompt

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Maximum characters in one chat line
pub const CHAT_MAX_LEN: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Still typing
    Editing,
    /// Enter pressed on a non-blank line
    Submit(String),
    /// Prompt closed without sending
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct ChatPrompt {
    buffer: String,
    open: bool,
}

impl ChatPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
        self.buffer.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Feed a key to the open prompt
    pub fn handle_key(&mut self, key: KeyEvent) -> ChatOutcome {
        if !self.open || key.kind == KeyEventKind::Release {
            return ChatOutcome::Editing;
        }
        match key.code {
            KeyCode::Enter => {
                self.open = false;
                let text = std::mem::take(&mut self.buffer);
                let text = text.trim();
                if text.is_empty() {
                    ChatOutcome::Cancel
                } else {
                    ChatOutcome::Submit(text.to_string())
                }
            }
            KeyCode::Esc => {
                self.open = false;
                self.buffer.clear();
                ChatOutcome::Cancel
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                ChatOutcome::Editing
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && self.buffer.chars().count() < CHAT_MAX_LEN =>
            {
                self.buffer.push(c);
                ChatOutcome::Editing
            }
            _ => ChatOutcome::Editing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(prompt: &mut ChatPrompt, s: &str) {
        for c in s.chars() {
            prompt.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit() {
        let mut prompt = ChatPrompt::new();
        prompt.open();
        type_str(&mut prompt, " gg wpx");
        prompt.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(prompt.text(), " gg wp");
        assert_eq!(
            prompt.handle_key(KeyEvent::from(KeyCode::Enter)),
            ChatOutcome::Submit("gg wp".into())
        );
        assert!(!prompt.is_open());
    }

    #[test]
    fn test_blank_and_escape_cancel() {
        let mut prompt = ChatPrompt::new();
        prompt.open();
        type_str(&mut prompt, "   ");
        assert_eq!(
            prompt.handle_key(KeyEvent::from(KeyCode::Enter)),
            ChatOutcome::Cancel
        );
        prompt.open();
        type_str(&mut prompt, "hello");
        assert_eq!(
            prompt.handle_key(KeyEvent::from(KeyCode::Esc)),
            ChatOutcome::Cancel
        );
        assert_eq!(prompt.text(), "");
    }

    #[test]
    fn test_closed_prompt_ignores_keys() {
        let mut prompt = ChatPrompt::new();
        type_str(&mut prompt, "abc");
        assert_eq!(prompt.text(), "");
    }
}
