//! Input modal component

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    error::{AppResult, Dismissal},
    ui::theme::Theme,
};

use super::{KeyOutcome, ModalView, ViewProps};

/// Prompt shown by [`InputModal`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    pub title: String,
    pub prompt: String,
    pub placeholder: String,
    /// Text the field starts with
    pub initial: String,
    /// Refuse to submit an empty value
    pub required: bool,
}

impl InputRequest {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = initial.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Single line text entry; resolves with the entered text
pub struct InputModal {
    input: String,
    cursor: usize, // in chars
    primed: bool,
}

impl InputModal {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            primed: false,
        }
    }

    /// Get the current input value
    pub fn input(&self) -> &str {
        &self.input
    }

    fn prime(&mut self, request: &InputRequest) {
        if !self.primed {
            self.input = request.initial.clone();
            self.cursor = self.input.chars().count();
            self.primed = true;
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(index, _)| index)
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }
}

impl Default for InputModal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalView for InputModal {
    type Value = InputRequest;
    type Output = String;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: &ViewProps<Self>, theme: &Theme) {
        let request = props.value();
        self.prime(request);

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(request.title.as_str(), theme.title_style()))
            .border_style(theme.modal_border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Prompt
                Constraint::Length(3), // Input field
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        let prompt = Paragraph::new(request.prompt.as_str())
            .style(theme.text_style())
            .wrap(Wrap { trim: true });
        frame.render_widget(prompt, chunks[0]);

        let (text, style) = if self.input.is_empty() && !request.placeholder.is_empty() {
            (request.placeholder.as_str(), theme.muted_style())
        } else {
            (self.input.as_str(), theme.text_style())
        };

        let field = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.success_style()),
            )
            .style(style);
        frame.render_widget(field, chunks[1]);

        let cursor_x = chunks[1].x + 1 + self.input.chars().take(self.cursor).count() as u16;
        frame.set_cursor(cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1);

        let help = Paragraph::new("Enter: Submit | Esc: Cancel | Ctrl+U: Clear")
            .style(theme.muted_style())
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent, props: &ViewProps<Self>) -> AppResult<KeyOutcome> {
        let request = props.value();
        self.prime(request);

        let outcome = match key.code {
            KeyCode::Enter => {
                if request.required && self.input.trim().is_empty() {
                    KeyOutcome::Ignored
                } else if props.resolve(self.input.clone()) {
                    KeyOutcome::Settled
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Esc => {
                if props.reject(Dismissal::Cancelled) {
                    KeyOutcome::Settled
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.cursor = 0;
                KeyOutcome::Handled
            }
            KeyCode::Char(c) => {
                let index = self.byte_index();
                self.input.insert(index, c);
                self.cursor += 1;
                KeyOutcome::Handled
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let index = self.byte_index();
                    self.input.remove(index);
                }
                KeyOutcome::Handled
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    let index = self.byte_index();
                    self.input.remove(index);
                }
                KeyOutcome::Handled
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                KeyOutcome::Handled
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                KeyOutcome::Handled
            }
            KeyCode::Home => {
                self.cursor = 0;
                KeyOutcome::Handled
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        };

        Ok(outcome)
    }

    fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.primed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::AsyncModalState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut InputModal, props: &ViewProps<InputModal>, text: &str) {
        for c in text.chars() {
            view.handle_key_event(key(KeyCode::Char(c)), props).unwrap();
        }
    }

    #[tokio::test]
    async fn test_enter_resolves_with_typed_text() {
        let state: AsyncModalState<InputRequest, String> = AsyncModalState::new();
        let entered = state.show_modal(InputRequest::new("Tag", "Tag name"));
        let props = state.current().into_props().unwrap();

        let mut view = InputModal::new();
        type_text(&mut view, &props, "v1.0");
        view.handle_key_event(key(KeyCode::Backspace), &props).unwrap();
        type_text(&mut view, &props, "1");
        view.handle_key_event(key(KeyCode::Enter), &props).unwrap();

        assert_eq!(entered.await, Ok("v1.1".to_string()));
    }

    #[tokio::test]
    async fn test_initial_text_and_multibyte_editing() {
        let state: AsyncModalState<InputRequest, String> = AsyncModalState::new();
        let entered = state.show_modal(InputRequest::new("Name", "Name").with_initial("héllo"));
        let props = state.current().into_props().unwrap();

        let mut view = InputModal::new();
        view.handle_key_event(key(KeyCode::Home), &props).unwrap();
        view.handle_key_event(key(KeyCode::Right), &props).unwrap();
        view.handle_key_event(key(KeyCode::Delete), &props).unwrap();
        type_text(&mut view, &props, "e");
        view.handle_key_event(key(KeyCode::Enter), &props).unwrap();

        assert_eq!(entered.await, Ok("hello".to_string()));
    }

    #[test]
    fn test_required_input_refuses_empty_submit() {
        let state: AsyncModalState<InputRequest, String> = AsyncModalState::new();
        let _entered = state.show_modal(InputRequest::new("Tag", "Tag name").required());
        let props = state.current().into_props().unwrap();

        let mut view = InputModal::new();
        let outcome = view.handle_key_event(key(KeyCode::Enter), &props).unwrap();

        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(state.is_open());
    }
}
