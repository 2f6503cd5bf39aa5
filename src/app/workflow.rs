//! Scripted release workflow driven entirely by awaited modals
//!
//! The workflow asks for a tag, confirms publication and then shows a
//! cancellable progress modal while a worker task advances the gauge. It only
//! ever talks to the modal states; whoever renders them (the terminal host or
//! the headless responder) decides how the interactions conclude.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use super::events::EventSender;
use crate::{
    error::{AppResult, InteractionError, InteractionResult},
    ui::modals::{ConfirmRequest, InputRequest, ModalHandles, ProgressHandle, ProgressRequest},
};

/// Number of increments the simulated publish takes
const PUBLISH_STEPS: u16 = 20;

pub struct ReleaseWorkflow {
    modals: ModalHandles,
    events: EventSender,
    step_delay: Duration,
}

impl ReleaseWorkflow {
    pub fn new(modals: ModalHandles, events: EventSender) -> Self {
        Self {
            modals,
            events,
            step_delay: Duration::from_millis(120),
        }
    }

    /// Delay between progress increments of the simulated publish
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Run the workflow, returning a one-line summary
    pub async fn run(self) -> AppResult<String> {
        info!("Release workflow started");
        self.events.activity("Asking for a release tag");

        let request = InputRequest::new("New release", "Tag to publish")
            .with_placeholder("v1.2.3")
            .required();
        let Some(tag) = cancellable(self.modals.input.show_modal(request).await)? else {
            return Ok(self.finish("Release cancelled before choosing a tag"));
        };
        let tag = tag.trim().to_string();
        self.events.activity(format!("Tag chosen: {}", tag));

        let request = ConfirmRequest::new("Publish", format!("Publish release {}?", tag))
            .with_buttons("Publish", "Keep draft");
        match cancellable(self.modals.confirm.show_modal(request).await)? {
            Some(true) => {}
            Some(false) => return Ok(self.finish(format!("Release {} kept as draft", tag))),
            None => return Ok(self.finish(format!("Release {} cancelled", tag))),
        }

        let progress = ProgressHandle::new();
        let request = ProgressRequest::new(
            format!("Publishing {}", tag),
            "Uploading release artifacts",
            progress.clone(),
        )
        .cancellable();
        let published = self.modals.progress.show_modal(request);
        let worker = tokio::spawn(publish(progress, self.step_delay));

        let outcome = cancellable(published.await);
        worker.abort();

        match outcome? {
            Some(()) => Ok(self.finish(format!("Published release {}", tag))),
            None => Ok(self.finish(format!("Publishing {} cancelled", tag))),
        }
    }

    fn finish(&self, summary: impl Into<String>) -> String {
        let summary = summary.into();
        info!("Release workflow finished: {}", summary);
        self.events.activity(summary.clone());
        summary
    }
}

/// Treat a user rejection as `None`; every other failure is an error
fn cancellable<T>(outcome: InteractionResult<T>) -> AppResult<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(InteractionError::Rejected(reason)) => {
            debug!("Interaction rejected: {}", reason);
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

async fn publish(progress: ProgressHandle, step_delay: Duration) {
    for step in 1..=PUBLISH_STEPS {
        sleep(step_delay).await;
        progress.set(step * 100 / PUBLISH_STEPS);
    }
}

