//! Deferred result of a `show_modal` call

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::state::InteractionId;
use crate::error::{Dismissal, InteractionError};

/// Future that settles once the modal UI resolves or rejects the interaction
///
/// Dropping it does not close the modal; the interaction stays open until the
/// UI settles it and the outcome is discarded.
#[must_use = "the interaction result is lost unless the deferred result is awaited"]
pub struct DeferredResult<R, E = Dismissal> {
    id: InteractionId,
    receiver: oneshot::Receiver<Result<R, InteractionError<E>>>,
}

impl<R, E> DeferredResult<R, E> {
    pub(crate) fn new(
        id: InteractionId,
        receiver: oneshot::Receiver<Result<R, InteractionError<E>>>,
    ) -> Self {
        Self { id, receiver }
    }

    /// Interaction this result belongs to
    pub fn id(&self) -> InteractionId {
        self.id
    }

    /// Take the outcome without waiting, `None` while still pending
    pub fn try_settled(&mut self) -> Option<Result<R, InteractionError<E>>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(InteractionError::Dropped)),
        }
    }
}

impl<R, E> Future for DeferredResult<R, E> {
    type Output = Result<R, InteractionError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(InteractionError::Dropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::modal::AsyncModalState;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[test]
    fn test_pending_until_resolved_and_wakes_waiter() {
        let modal: AsyncModalState<(), u8> = AsyncModalState::new();
        let mut result = task::spawn(modal.show_modal(()));

        assert_pending!(result.poll());

        modal.current().into_props().unwrap().resolve(7);
        assert!(result.is_woken());
        assert_ready_eq!(result.poll(), Ok(7));
    }

    #[test]
    fn test_result_reports_its_interaction() {
        let modal: AsyncModalState<u8, ()> = AsyncModalState::new();
        let result = modal.show_modal(1);

        assert_eq!(modal.current().interaction_id(), Some(result.id()));
    }
}
