//! Confirmation modal component

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    error::{AppResult, Dismissal},
    ui::theme::Theme,
};

use super::{KeyOutcome, ModalView, ViewProps};

/// Question shown by [`ConfirmationModal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Yes".to_string(),
            cancel_text: "No".to_string(),
        }
    }

    /// Use custom button texts
    pub fn with_buttons(mut self, confirm_text: impl Into<String>, cancel_text: impl Into<String>) -> Self {
        self.confirm_text = confirm_text.into();
        self.cancel_text = cancel_text.into();
        self
    }
}

/// Yes/no decision; resolves with `true` for the confirm button
pub struct ConfirmationModal {
    selected_button: usize, // 0 = confirm, 1 = cancel
}

impl ConfirmationModal {
    pub fn new() -> Self {
        Self { selected_button: 0 }
    }

    pub fn confirm_selected(&self) -> bool {
        self.selected_button == 0
    }
}

impl Default for ConfirmationModal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalView for ConfirmationModal {
    type Value = ConfirmRequest;
    type Output = bool;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: &ViewProps<Self>, theme: &Theme) {
        let request = props.value();

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
                Constraint::Min(1),    // Message area
                Constraint::Length(3), // Button area
            ])
            .split(inner);

        let message = Paragraph::new(request.message.as_str())
            .style(theme.text_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let confirm_button = Paragraph::new(Line::from(Span::styled(
            request.confirm_text.as_str(),
            theme.button_style(self.selected_button == 0, true),
        )))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style()))
        .alignment(Alignment::Center);
        frame.render_widget(confirm_button, buttons[0]);

        let cancel_button = Paragraph::new(Line::from(Span::styled(
            request.cancel_text.as_str(),
            theme.button_style(self.selected_button == 1, false),
        )))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style()))
        .alignment(Alignment::Center);
        frame.render_widget(cancel_button, buttons[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent, props: &ViewProps<Self>) -> AppResult<KeyOutcome> {
        let outcome = match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_button = 0;
                KeyOutcome::Handled
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_button = 1;
                KeyOutcome::Handled
            }
            KeyCode::Tab | KeyCode::Char(' ') => {
                self.selected_button = 1 - self.selected_button;
                KeyOutcome::Handled
            }
            KeyCode::Enter => settled(props.resolve(self.confirm_selected())),
            KeyCode::Char('y') | KeyCode::Char('Y') => settled(props.resolve(true)),
            KeyCode::Char('n') | KeyCode::Char('N') => settled(props.resolve(false)),
            KeyCode::Esc => settled(props.reject(Dismissal::Cancelled)),
            _ => KeyOutcome::Ignored,
        };

        Ok(outcome)
    }

    fn reset(&mut self) {
        self.selected_button = 0;
    }
}

fn settled(accepted: bool) -> KeyOutcome {
    if accepted {
        KeyOutcome::Settled
    } else {
        KeyOutcome::Ignored
    }
}
