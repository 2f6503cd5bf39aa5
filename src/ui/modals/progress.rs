//! Progress modal component

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::sync::{
    atomic::{AtomicU16, Ordering},
    Arc,
};

use crate::{
    error::{AppResult, Dismissal},
    ui::theme::Theme,
};

use super::{KeyOutcome, ModalView, ViewProps};

/// Shared progress counter (0-100) updated by the task doing the work
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<AtomicU16>);

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, percent: u16) {
        self.0.store(percent.min(100), Ordering::Release);
    }

    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_complete(&self) -> bool {
        self.get() >= 100
    }
}

/// Long-running operation shown by [`ProgressModal`]
#[derive(Debug, Clone)]
pub struct ProgressRequest {
    pub title: String,
    pub message: String,
    pub cancellable: bool,
    pub progress: ProgressHandle,
}

impl ProgressRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>, progress: ProgressHandle) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            cancellable: false,
            progress,
        }
    }

    pub fn cancellable(mut self) -> Self {
        self.cancellable = true;
        self
    }
}

/// Gauge that resolves once its progress handle reaches 100
pub struct ProgressModal;

impl ProgressModal {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProgressModal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalView for ProgressModal {
    type Value = ProgressRequest;
    type Output = ();

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
                Constraint::Min(1),    // Message
                Constraint::Length(1), // Gauge
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        let message = Paragraph::new(request.message.as_str())
            .style(theme.text_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        let gauge = Gauge::default()
            .gauge_style(theme.success_style())
            .percent(request.progress.get());
        frame.render_widget(gauge, chunks[1]);

        if request.cancellable {
            let help = Paragraph::new("Esc: Cancel")
                .style(theme.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(help, chunks[2]);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, props: &ViewProps<Self>) -> AppResult<KeyOutcome> {
        match key.code {
            KeyCode::Esc if props.value().cancellable => {
                if props.reject(Dismissal::Cancelled) {
                    Ok(KeyOutcome::Settled)
                } else {
                    Ok(KeyOutcome::Ignored)
                }
            }
            _ => Ok(KeyOutcome::Ignored),
        }
    }

    fn tick(&mut self, props: &ViewProps<Self>) {
        if props.value().progress.is_complete() {
            props.resolve(());
        }
    }

    fn is_animating(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::AsyncModalState;
    use crossterm::event::KeyModifiers;

    #[tokio::test]
    async fn test_tick_resolves_when_complete() {
        let state: AsyncModalState<ProgressRequest, ()> = AsyncModalState::new();
        let progress = ProgressHandle::new();
        let done = state.show_modal(ProgressRequest::new("Sync", "Syncing", progress.clone()));
        let props = state.current().into_props().unwrap();

        let mut view = ProgressModal::new();
        progress.set(60);
        view.tick(&props);
        assert!(state.is_open());

        progress.set(250);
        assert_eq!(progress.get(), 100);
        view.tick(&props);

        assert_eq!(done.await, Ok(()));
        assert!(!state.is_open());
    }

    #[test]
    fn test_escape_only_cancels_cancellable_progress() {
        let state: AsyncModalState<ProgressRequest, ()> = AsyncModalState::new();
        let _done = state.show_modal(ProgressRequest::new("Sync", "Syncing", ProgressHandle::new()));
        let props = state.current().into_props().unwrap();

        let mut view = ProgressModal::new();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(view.handle_key_event(esc, &props).unwrap(), KeyOutcome::Ignored);
        assert!(state.is_open());
    }
}
