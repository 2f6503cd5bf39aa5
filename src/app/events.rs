//! Application event system
//!
//! Background tasks report to the host loop through an unbounded tokio
//! channel; the loop drains it without blocking between renders.

use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};

/// Event handler for async operations
pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_receive_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Get a cloned sender for background tasks
    pub fn sender(&self) -> EventSender {
        EventSender(self.event_sender.clone())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half handed to background tasks
#[derive(Clone)]
pub struct EventSender(mpsc::UnboundedSender<AppEvent>);

impl EventSender {
    /// Report progress; a closed host is not an error for the reporter
    pub fn activity(&self, message: impl Into<String>) {
        let _ = self.0.send(AppEvent::Activity(message.into()));
    }

    pub fn send(&self, event: AppEvent) -> AppResult<()> {
        self.0
            .send(event)
            .map_err(|_| AppError::state("Failed to send application event"))
    }
}

/// Application events for async communication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Human readable progress of a background task
    Activity(String),

    /// The scripted workflow finished with a summary or an error message
    WorkflowFinished(Result<String, String>),
}
