//! Lifecycle tests for the modal state manager

use async_modal::{
    error::{Dismissal, InteractionError},
    modal::{AsyncModal, AsyncModalProps, AsyncModalState, OverlapPolicy},
};
use parking_lot::Mutex;
use std::{
    future::Future,
    pin::pin,
    sync::Arc,
    task::{Context, Poll, Wake, Waker},
    time::Duration,
};
use tokio::time::timeout;

/// Waker that records what the modal looked like when the result woke it
struct StateAtWake<V, R> {
    modal: AsyncModalState<V, R>,
    seen: Mutex<Option<Option<V>>>,
}

impl<V: Clone + Send + Sync, R: Send + Sync> Wake for StateAtWake<V, R> {
    fn wake(self: Arc<Self>) {
        *self.seen.lock() = Some(self.modal.current().value().cloned());
    }
}

#[test]
fn test_modal_is_initially_closed() {
    let modal: AsyncModalState = AsyncModalState::new();

    assert!(!modal.is_open());
    assert!(modal.current().props().is_none());
    assert_eq!(modal.policy(), OverlapPolicy::Supersede);
}

#[test]
fn test_show_modal_opens_the_modal() {
    let modal: AsyncModalState = AsyncModalState::new();
    let _result = modal.show_modal(());

    assert!(modal.is_open());
    assert_eq!(modal.current().value(), Some(&()));
}

#[test]
fn test_show_modal_makes_its_argument_available() {
    let modal: AsyncModalState<u32, ()> = AsyncModalState::new();
    let result = modal.show_modal(42);

    let state = modal.current();
    assert_eq!(state.value(), Some(&42));
    assert_eq!(state.interaction_id(), Some(result.id()));
}

#[tokio::test]
async fn test_resolve_closes_its_modal() {
    let modal: AsyncModalState = AsyncModalState::new();
    let result = modal.show_modal(());

    let props = modal.current().into_props().unwrap();
    assert!(props.resolve(()));

    assert_eq!(result.await, Ok(()));
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_resolve_delivers_result() {
    let modal: AsyncModalState<String, usize> = AsyncModalState::new();
    let result = modal.show_modal("count me".to_string());

    let props = modal.current().into_props().unwrap();
    props.resolve(props.value().len());

    assert_eq!(result.await, Ok(8));
}

#[tokio::test]
async fn test_reject_closes_and_forwards_reason() {
    let modal: AsyncModalState<(), (), String> = AsyncModalState::new();
    let result = modal.show_modal(());

    let props = modal.current().into_props().unwrap();
    assert!(props.reject("user said no".to_string()));
    assert!(!modal.is_open());

    let error = result.await.unwrap_err();
    assert!(error.is_rejection());
    assert_eq!(error.into_reason(), Some("user said no".to_string()));
}

#[tokio::test]
async fn test_state_stays_closed_after_settlement() {
    let modal: AsyncModalState<u8, u8> = AsyncModalState::new();
    let result = modal.show_modal(1);
    let props = modal.current().into_props().unwrap();

    props.resolve(2);
    assert_eq!(result.await, Ok(2));

    for _ in 0..3 {
        assert!(!modal.is_open());
        assert!(modal.current().value().is_none());
    }
}

#[tokio::test]
async fn test_late_callbacks_are_noops() {
    let modal: AsyncModalState<u8, u8> = AsyncModalState::new();
    let result = modal.show_modal(1);
    let props = modal.current().into_props().unwrap();

    assert!(props.resolve(10));
    assert!(!props.resolve(20));
    assert!(!props.reject(Dismissal::Cancelled));
    assert!(!props.is_pending());

    assert_eq!(result.await, Ok(10));
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_each_invocation_gets_fresh_callbacks() {
    let modal: AsyncModalState<&'static str, u32> = AsyncModalState::new();

    let first = modal.show_modal("first");
    let first_props = modal.current().into_props().unwrap();
    first_props.resolve(1);
    assert_eq!(first.await, Ok(1));

    let second = modal.show_modal("second");
    let second_props = modal.current().into_props().unwrap();
    assert_ne!(first_props.id(), second_props.id());

    // The first interaction's callbacks must not touch the second one
    assert!(!first_props.resolve(99));
    assert!(modal.is_open());
    assert_eq!(modal.current().value(), Some(&"second"));

    second_props.resolve(2);
    assert_eq!(second.await, Ok(2));
}

#[tokio::test]
async fn test_supersede_settles_previous_interaction() {
    let modal: AsyncModalState<u32, u32> = AsyncModalState::with_policy(OverlapPolicy::Supersede);

    let first = modal.show_modal(1);
    let first_props = modal.current().into_props().unwrap();
    let second = modal.show_modal(2);

    assert_eq!(first.await, Err(InteractionError::Superseded));
    assert_eq!(modal.current().value(), Some(&2));

    // Stale props cannot close the newer modal
    assert!(!first_props.reject(Dismissal::Cancelled));
    assert!(modal.is_open());

    modal.current().into_props().unwrap().resolve(20);
    assert_eq!(second.await, Ok(20));
}

#[tokio::test]
async fn test_refuse_keeps_first_interaction() {
    let modal: AsyncModalState<u32, u32> = AsyncModalState::with_policy(OverlapPolicy::Refuse);

    let first = modal.show_modal(1);
    let refused = modal.show_modal(2);

    assert_eq!(refused.await, Err(InteractionError::Busy));
    assert_eq!(modal.current().value(), Some(&1));

    modal.current().into_props().unwrap().resolve(10);
    assert_eq!(first.await, Ok(10));
}

#[tokio::test]
async fn test_dismiss_rejects_pending_interaction() {
    let modal: AsyncModalState<(), ()> = AsyncModalState::new();
    let result = modal.show_modal(());

    assert!(modal.dismiss(Dismissal::Closed));
    assert!(!modal.is_open());
    assert_eq!(
        result.await,
        Err(InteractionError::Rejected(Dismissal::Closed))
    );
}

#[tokio::test]
async fn test_dropping_state_settles_with_dropped() {
    let modal: AsyncModalState<(), ()> = AsyncModalState::new();
    let result = modal.show_modal(());
    let props = modal.current().into_props().unwrap();

    drop(modal);

    assert_eq!(result.await, Err(InteractionError::Dropped));
    assert!(!props.resolve(()));
}

#[tokio::test]
async fn test_caller_dropping_result_still_closes_modal() {
    let modal: AsyncModalState<(), ()> = AsyncModalState::new();
    drop(modal.show_modal(()));

    let props = modal.current().into_props().unwrap();
    assert!(props.resolve(()));
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_try_settled_reports_pending_and_outcome() {
    let modal: AsyncModalState<(), u8> = AsyncModalState::new();
    let mut result = modal.show_modal(());

    assert_eq!(result.try_settled(), None);
    modal.current().into_props().unwrap().resolve(5);
    assert_eq!(result.try_settled(), Some(Ok(5)));
}

#[tokio::test]
async fn test_watcher_observes_open_and_close() {
    let modal: AsyncModalState<u32, ()> = AsyncModalState::new();
    let mut watcher = modal.subscribe();
    assert!(!watcher.has_changed());

    let result = modal.show_modal(7);
    let opened = timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(opened.value(), Some(&7));

    opened.props().unwrap().resolve(());
    let closed = timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(!closed.is_open());

    result.await.unwrap();
}

#[tokio::test]
async fn test_awaiting_task_is_settled_from_ui_side() {
    let modal: AsyncModalState<String, bool> = AsyncModalState::new();
    let mut watcher = modal.subscribe();

    let caller = {
        let modal = modal.clone();
        tokio::spawn(async move { modal.show_modal("Proceed?".to_string()).await })
    };

    let state = timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    state.props().unwrap().resolve(true);

    assert_eq!(caller.await.unwrap(), Ok(true));
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_async_modal_renders_only_while_open() {
    let modal = AsyncModal::new(|props: &AsyncModalProps<u32, u32>| format!("value={}", props.value()));
    assert_eq!(modal.render(), None::<String>);

    let result = modal.show_modal(3);
    assert_eq!(modal.render(), Some("value=3".to_string()));

    modal.state().current().into_props().unwrap().resolve(6);
    assert_eq!(result.await, Ok(6));
    assert_eq!(modal.render(), None::<String>);
}

#[tokio::test]
async fn test_async_modal_render_callback_may_settle() {
    let modal = AsyncModal::new(|props: &AsyncModalProps<(), ()>| props.resolve(()));

    let result = modal.show_modal(());
    assert_eq!(modal.render(), Some(true));
    assert_eq!(result.await, Ok(()));
    assert!(!modal.state().is_open());
}

#[test]
fn test_state_is_closed_before_result_wakes_caller() {
    let modal: AsyncModalState<u32, u32> = AsyncModalState::new();
    let recorder = Arc::new(StateAtWake {
        modal: modal.clone(),
        seen: Mutex::new(None),
    });
    let waker = Waker::from(Arc::clone(&recorder));
    let mut cx = Context::from_waker(&waker);

    let mut result = pin!(modal.show_modal(1));
    assert!(result.as_mut().poll(&mut cx).is_pending());

    modal.current().into_props().unwrap().resolve(7);

    assert_eq!(*recorder.seen.lock(), Some(None));
    assert_eq!(result.as_mut().poll(&mut cx), Poll::Ready(Ok(7)));
}

#[test]
fn test_superseded_caller_wakes_to_the_new_modal() {
    let modal: AsyncModalState<u32, u32> = AsyncModalState::new();
    let recorder = Arc::new(StateAtWake {
        modal: modal.clone(),
        seen: Mutex::new(None),
    });
    let waker = Waker::from(Arc::clone(&recorder));
    let mut cx = Context::from_waker(&waker);

    let mut first = pin!(modal.show_modal(1));
    assert!(first.as_mut().poll(&mut cx).is_pending());

    let _second = modal.show_modal(2);

    assert_eq!(*recorder.seen.lock(), Some(Some(2)));
    assert_eq!(
        first.as_mut().poll(&mut cx),
        Poll::Ready(Err(InteractionError::Superseded))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_awaiter_on_another_worker_never_sees_open_after_settle() {
    for _ in 0..500 {
        let modal: AsyncModalState<(), u32> = AsyncModalState::new();
        let result = modal.show_modal(());
        let props = modal.current().into_props().unwrap();

        let awaiter = {
            let modal = modal.clone();
            tokio::spawn(async move {
                let outcome = result.await;
                (outcome, modal.is_open())
            })
        };
        tokio::spawn(async move { props.resolve(1) });

        let (outcome, open_after) = awaiter.await.unwrap();
        assert_eq!(outcome, Ok(1));
        assert!(!open_after);
    }
}

#[tokio::test]
async fn test_resolve_with_closes_once_the_result_is_ready() {
    let modal: AsyncModalState<(), String> = AsyncModalState::new();
    let result = modal.show_modal(());
    let props = modal.current().into_props().unwrap();

    let (sender, receiver) = tokio::sync::oneshot::channel::<String>();
    let settling = tokio::spawn(async move {
        props
            .resolve_with(async move { receiver.await.unwrap_or_default() })
            .await
    });

    tokio::task::yield_now().await;
    assert!(modal.is_open());

    sender.send("saved".to_string()).unwrap();
    assert!(settling.await.unwrap());
    assert_eq!(result.await, Ok("saved".to_string()));
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_resolve_with_after_supersede_is_noop() {
    let modal: AsyncModalState<u32, u32> = AsyncModalState::new();
    let _first = modal.show_modal(1);
    let stale = modal.current().into_props().unwrap();
    let _second = modal.show_modal(2);

    assert!(!stale.resolve_with(async { 5 }).await);
    assert_eq!(modal.current().value(), Some(&2));
}
