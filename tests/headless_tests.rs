//! End-to-end runs of the release workflow against the headless responder

use async_modal::{
    app::headless::{run_headless, ScriptedAnswers},
    modal::OverlapPolicy,
    ui::ModalHandles,
};
use std::time::Duration;
use tokio::time::timeout;

const STEP: Duration = Duration::from_millis(1);

async fn run(answers: ScriptedAnswers) -> String {
    let modals = ModalHandles::new(OverlapPolicy::Supersede);
    let summary = timeout(Duration::from_secs(5), run_headless(modals.clone(), answers, STEP))
        .await
        .expect("workflow timed out")
        .expect("workflow failed");

    assert!(!modals.input.is_open());
    assert!(!modals.confirm.is_open());
    assert!(!modals.progress.is_open());
    summary
}

#[tokio::test]
async fn test_default_answers_publish_release() {
    let summary = run(ScriptedAnswers::default()).await;
    assert_eq!(summary, "Published release v0.1.0");
}

#[tokio::test]
async fn test_entered_tag_is_trimmed() {
    let summary = run(ScriptedAnswers {
        input: Some("  v9.9.9 ".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(summary, "Published release v9.9.9");
}

#[tokio::test]
async fn test_cancelled_input_stops_workflow() {
    let summary = run(ScriptedAnswers {
        input: None,
        ..Default::default()
    })
    .await;
    assert_eq!(summary, "Release cancelled before choosing a tag");
}

#[tokio::test]
async fn test_declined_confirmation_keeps_draft() {
    let summary = run(ScriptedAnswers {
        confirm: Some(false),
        ..Default::default()
    })
    .await;
    assert_eq!(summary, "Release v0.1.0 kept as draft");
}

#[tokio::test]
async fn test_cancelled_confirmation() {
    let summary = run(ScriptedAnswers {
        confirm: None,
        ..Default::default()
    })
    .await;
    assert_eq!(summary, "Release v0.1.0 cancelled");
}

#[tokio::test]
async fn test_cancelled_progress() {
    let summary = run(ScriptedAnswers {
        cancel_progress: true,
        ..Default::default()
    })
    .await;
    assert_eq!(summary, "Publishing v0.1.0 cancelled");
}
