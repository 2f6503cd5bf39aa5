//! Application core module
//!
//! The terminal host: renders an activity log with the modal slots layered on
//! top, routes keys to whichever modal is open and redraws whenever a modal
//! state changes. The release workflow runs as a separate tokio task that only
//! awaits modals.

pub mod events;
pub mod headless;
pub mod state;
pub mod workflow;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{AppError, AppResult, Dismissal},
    ui::{modals::KeyOutcome, ModalHost, Theme},
};
use events::{AppEvent, EventHandler};
use state::{ActivityLevel, AppState, WorkflowStatus};
use workflow::ReleaseWorkflow;

/// Main application struct
pub struct App {
    state: AppState,
    event_handler: EventHandler,
    host: ModalHost,
    theme: Theme,
    config: Config,
    workflow: Option<JoinHandle<()>>,
    startup_time: Duration,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> AppResult<Self> {
        let init_start = Instant::now();
        info!("Initializing {}", config.app.name);

        let theme = Theme::load(&config.ui.theme)?;
        let host = ModalHost::new(&config.modal, &config.ui);

        let startup_time = init_start.elapsed();
        debug!("Application initialized in {:?}", startup_time);

        Ok(Self {
            state: AppState::new(),
            event_handler: EventHandler::new(),
            host,
            theme,
            config,
            workflow: None,
            startup_time,
        })
    }

    /// Run the main application loop
    ///
    /// Sets up the terminal, runs until the user quits and always restores
    /// the terminal afterwards.
    pub async fn run(mut self) -> AppResult<()> {
        info!("Starting application main loop");

        setup_terminal()?;
        let result = self.main_loop().await;
        self.finish(result, cleanup_terminal())
    }

    /// Shut down whether or not the terminal could be restored
    fn finish(&mut self, result: AppResult<()>, cleanup: AppResult<()>) -> AppResult<()> {
        self.shutdown();
        result.and(cleanup)
    }

    async fn main_loop(&mut self) -> AppResult<()> {
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;
        self.event_loop(&mut terminal).await
    }

    /// Drive rendering and input on any backend
    pub async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let poll_interval = Duration::from_millis(self.config.ui.refresh_rate_ms);
        self.start_workflow();

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.draw(terminal)?;
            }

            needs_redraw = self.handle_terminal_events(poll_interval)?;

            self.host.tick();
            needs_redraw |= self.host.poll_changed();
            needs_redraw |= self.process_app_events();

            if self.state.should_quit() {
                info!("Application quit requested");
                break;
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Spawn the release workflow unless one is already running
    pub fn start_workflow(&mut self) {
        if self.state.workflow().is_running() {
            return;
        }

        let workflow = ReleaseWorkflow::new(self.host.handles(), self.event_handler.sender());
        let sender = self.event_handler.sender();
        self.workflow = Some(tokio::spawn(async move {
            let result = workflow.run().await.map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::WorkflowFinished(result));
        }));

        self.state.set_workflow(WorkflowStatus::Running);
        self.state.push_activity(ActivityLevel::Info, "Release workflow started");
    }

    /// Poll the terminal once, returning whether anything changed
    fn handle_terminal_events(&mut self, poll_interval: Duration) -> AppResult<bool> {
        if !event::poll(poll_interval)? {
            return Ok(false);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key_event(key)?;
                Ok(true)
            }
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Route a key to the open modal, or treat it as a global shortcut
    pub fn handle_key_event(&mut self, key: KeyEvent) -> AppResult<()> {
        if self.host.any_open() {
            if self.host.handle_key_event(key)? == KeyOutcome::Settled {
                debug!("Modal settled by key {:?}", key.code);
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.request_quit();
            }
            KeyCode::Char('r') => {
                self.start_workflow();
            }
            _ => {}
        }

        Ok(())
    }

    /// Drain background events, returning whether any arrived
    fn process_app_events(&mut self) -> bool {
        let mut received = false;
        while let Some(event) = self.event_handler.try_receive_event() {
            received = true;
            self.handle_app_event(event);
        }
        received
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Activity(message) => {
                self.state.push_activity(ActivityLevel::Info, message);
            }
            AppEvent::WorkflowFinished(Ok(summary)) => {
                self.state.push_activity(ActivityLevel::Success, summary.clone());
                self.state.set_workflow(WorkflowStatus::Finished(summary));
                self.workflow = None;
            }
            AppEvent::WorkflowFinished(Err(error)) => {
                warn!("Release workflow failed: {}", error);
                self.state.push_activity(ActivityLevel::Error, error.clone());
                self.state.set_workflow(WorkflowStatus::Failed(error));
                self.workflow = None;
            }
        }
    }

    /// Render one frame to `terminal`
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Activity log
                Constraint::Length(1), // Footer
            ])
            .split(size);

        self.render_header(frame, chunks[0]);
        self.render_activity(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);

        self.host.render(frame, size, &self.theme);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status = match self.state.workflow() {
            WorkflowStatus::Idle => Span::styled("idle", self.theme.muted_style()),
            WorkflowStatus::Running => Span::styled("running", self.theme.title_style()),
            WorkflowStatus::Finished(_) => Span::styled("finished", self.theme.success_style()),
            WorkflowStatus::Failed(_) => Span::styled("failed", self.theme.error_style()),
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(self.config.app.name.as_str(), self.theme.title_style()),
            Span::raw("  workflow: "),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(self.theme.border_style()));
        frame.render_widget(header, area);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let mut items: Vec<ListItem> = self
            .state
            .activity()
            .rev()
            .take(visible)
            .map(|entry| {
                let style = match entry.level {
                    ActivityLevel::Info => self.theme.text_style(),
                    ActivityLevel::Success => self.theme.success_style(),
                    ActivityLevel::Error => self.theme.error_style(),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        entry.timestamp.format("%H:%M:%S ").to_string(),
                        self.theme.muted_style(),
                    ),
                    Span::styled(entry.message.as_str(), style),
                ]))
            })
            .collect();
        items.reverse();

        let list = List::new(items).block(
            Block::default()
                .title("Activity")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(list, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = if self.host.any_open() {
            "Modal open: Enter confirms, Esc cancels"
        } else {
            "r: Run workflow | q: Quit"
        };
        frame.render_widget(Paragraph::new(help).style(self.theme.muted_style()), area);
    }

    /// Settle pending modals and stop the workflow task
    fn shutdown(&mut self) {
        if self.config.modal.dismiss_on_exit {
            let dismissed = self.host.dismiss_all(Dismissal::Closed);
            if dismissed > 0 {
                debug!("Dismissed {} pending modal(s) on exit", dismissed);
            }
        }

        if let Some(workflow) = self.workflow.take() {
            workflow.abort();
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn host(&self) -> &ModalHost {
        &self.host
    }

    /// Get application startup time for performance monitoring
    pub fn startup_time(&self) -> Duration {
        self.startup_time
    }
}

/// Setup terminal for TUI
fn setup_terminal() -> AppResult<()> {
    enable_raw_mode().map_err(|e| AppError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    execute!(std::io::stdout(), EnterAlternateScreen)
        .map_err(|e| AppError::Terminal(format!("Failed to enter alternate screen: {}", e)))?;
    Ok(())
}

/// Cleanup terminal after TUI
fn cleanup_terminal() -> AppResult<()> {
    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_keys_drive_workflow_through_modals() {
        let mut app = App::new(Config::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let handles = app.host().handles();

        app.start_workflow();
        wait_until(|| handles.input.is_open()).await;

        app.draw(&mut terminal).unwrap();
        assert!(screen_text(&terminal).contains("New release"));

        for c in "v2.0".chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(!handles.input.is_open());

        wait_until(|| handles.confirm.is_open()).await;
        app.draw(&mut terminal).unwrap();
        assert!(screen_text(&terminal).contains("Publish release v2.0?"));

        app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        wait_until(|| {
            app.process_app_events();
            !app.state().workflow().is_running()
        })
        .await;

        assert_eq!(
            app.state().workflow(),
            &WorkflowStatus::Finished("Release v2.0 kept as draft".to_string())
        );
    }

    #[tokio::test]
    async fn test_global_keys_are_ignored_while_modal_is_open() {
        let mut app = App::new(Config::default()).unwrap();
        let handles = app.host().handles();

        app.start_workflow();
        wait_until(|| handles.input.is_open()).await;

        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.state().should_quit());

        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!handles.input.is_open());
        assert!(!app.state().should_quit());
    }

    #[tokio::test]
    async fn test_shutdown_dismisses_pending_modals() {
        let mut app = App::new(Config::default()).unwrap();
        let handles = app.host().handles();

        app.start_workflow();
        wait_until(|| handles.input.is_open()).await;

        app.shutdown();
        assert!(!handles.input.is_open());
    }

    #[tokio::test]
    async fn test_failed_terminal_cleanup_still_shuts_down() {
        let mut app = App::new(Config::default()).unwrap();
        let handles = app.host().handles();

        app.start_workflow();
        wait_until(|| handles.input.is_open()).await;

        let cleanup = Err(AppError::Terminal("raw mode".to_string()));
        let result = app.finish(Ok(()), cleanup);

        assert!(matches!(result, Err(AppError::Terminal(_))));
        assert!(!handles.input.is_open());
        assert!(app.workflow.is_none());
    }
}
