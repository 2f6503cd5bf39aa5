//! Headless host: answers modals from a script instead of the keyboard
//!
//! Used by demo mode when no terminal is available. The responder subscribes
//! to the same modal states the terminal host would render, "renders" each
//! open modal to a log line and settles it with a scripted answer.

use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use super::{
    events::{AppEvent, EventHandler},
    workflow::ReleaseWorkflow,
};
use crate::{
    error::{AppResult, Dismissal},
    modal::{AsyncModal, AsyncModalProps, StateWatcher},
    ui::modals::{ConfirmRequest, InputRequest, ModalHandles, ProgressRequest},
};

/// Answers given by the [`AutoResponder`]
#[derive(Debug, Clone)]
pub struct ScriptedAnswers {
    /// Text entered into input modals; `None` cancels them
    pub input: Option<String>,
    /// Answer to confirmation modals; `None` cancels them
    pub confirm: Option<bool>,
    /// Cancel progress modals instead of waiting for completion
    pub cancel_progress: bool,
}

impl Default for ScriptedAnswers {
    fn default() -> Self {
        Self {
            input: Some("v0.1.0".to_string()),
            confirm: Some(true),
            cancel_progress: false,
        }
    }
}

type Describe<V, R> = fn(&AsyncModalProps<V, R, Dismissal>) -> String;

pub struct AutoResponder {
    answers: ScriptedAnswers,
    confirm: AsyncModal<Describe<ConfirmRequest, bool>, ConfirmRequest, bool>,
    input: AsyncModal<Describe<InputRequest, String>, InputRequest, String>,
    progress: AsyncModal<Describe<ProgressRequest, ()>, ProgressRequest, ()>,
    confirm_changes: StateWatcher<ConfirmRequest, bool>,
    input_changes: StateWatcher<InputRequest, String>,
    progress_changes: StateWatcher<ProgressRequest, ()>,
}

impl AutoResponder {
    /// Subscribes immediately, so modals opened before [`run`](Self::run)
    /// is first polled are still answered.
    pub fn new(modals: &ModalHandles, answers: ScriptedAnswers) -> Self {
        Self {
            answers,
            confirm: AsyncModal::from_state(
                modals.confirm.clone(),
                describe_confirm as Describe<ConfirmRequest, bool>,
            ),
            input: AsyncModal::from_state(
                modals.input.clone(),
                describe_input as Describe<InputRequest, String>,
            ),
            progress: AsyncModal::from_state(
                modals.progress.clone(),
                describe_progress as Describe<ProgressRequest, ()>,
            ),
            confirm_changes: modals.confirm.subscribe(),
            input_changes: modals.input.subscribe(),
            progress_changes: modals.progress.subscribe(),
        }
    }

    /// Answer modals until aborted
    pub async fn run(self) {
        let Self {
            answers,
            confirm,
            input,
            progress,
            mut confirm_changes,
            mut input_changes,
            mut progress_changes,
        } = self;
        let mut ticker = interval(Duration::from_millis(20));

        loop {
            tokio::select! {
                Some(state) = confirm_changes.changed() => {
                    if let (Some(props), Some(line)) = (state.props(), confirm.render()) {
                        info!("{}", line);
                        match answers.confirm {
                            Some(answer) => props.resolve(answer),
                            None => props.reject(Dismissal::Cancelled),
                        };
                    }
                }
                Some(state) = input_changes.changed() => {
                    if let (Some(props), Some(line)) = (state.props(), input.render()) {
                        info!("{}", line);
                        match &answers.input {
                            Some(text) => props.resolve(text.clone()),
                            None => props.reject(Dismissal::Cancelled),
                        };
                    }
                }
                Some(state) = progress_changes.changed() => {
                    if let (Some(props), Some(line)) = (state.props(), progress.render()) {
                        info!("{}", line);
                        if answers.cancel_progress {
                            props.reject(Dismissal::Cancelled);
                        }
                    }
                }
                _ = ticker.tick() => {
                    if let Some(props) = progress.state().current().props() {
                        if props.value().progress.is_complete() {
                            props.resolve(());
                        }
                    }
                }
            }
        }
    }
}

fn describe_confirm(props: &AsyncModalProps<ConfirmRequest, bool, Dismissal>) -> String {
    let request = props.value();
    format!(
        "[{}] {} ({} / {})",
        request.title, request.message, request.confirm_text, request.cancel_text
    )
}

fn describe_input(props: &AsyncModalProps<InputRequest, String, Dismissal>) -> String {
    let request = props.value();
    format!("[{}] {}", request.title, request.prompt)
}

fn describe_progress(props: &AsyncModalProps<ProgressRequest, (), Dismissal>) -> String {
    let request = props.value();
    format!("[{}] {}", request.title, request.message)
}

/// Run the release workflow against the auto responder
pub async fn run_headless(
    modals: ModalHandles,
    answers: ScriptedAnswers,
    step_delay: Duration,
) -> AppResult<String> {
    let mut events = EventHandler::new();
    let responder = tokio::spawn(AutoResponder::new(&modals, answers).run());

    let result = ReleaseWorkflow::new(modals, events.sender())
        .with_step_delay(step_delay)
        .run()
        .await;
    responder.abort();

    while let Some(event) = events.try_receive_event() {
        if let AppEvent::Activity(message) = event {
            info!("{}", message);
        }
    }

    result
}
