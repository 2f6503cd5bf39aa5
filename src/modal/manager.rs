//! The modal state manager
//!
//! [`AsyncModalState`] owns one modal slot. `show_modal` opens it and hands
//! back a [`DeferredResult`]; the modal UI concludes the interaction through
//! the `resolve`/`reject` callbacks carried by the published props, which
//! settles the deferred result and closes the slot in one step.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};

use super::{
    deferred::DeferredResult,
    state::{AsyncModalProps, InteractionId, InteractionState},
};
use crate::error::{Dismissal, InteractionError};

/// Behaviour of `show_modal` while a previous interaction is still pending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Settle the previous interaction with `InteractionError::Superseded`
    /// and open the new one in its place
    #[default]
    Supersede,
    /// Keep the previous interaction and fail the new call with
    /// `InteractionError::Busy`
    Refuse,
}

/// Manages the state of a modal UI element that can be invoked asynchronously
///
/// `V` is the argument to [`show_modal`](Self::show_modal), `R` the result the
/// modal resolves with and `E` the reason it rejects with. Cloning yields
/// another handle to the same slot.
pub struct AsyncModalState<V = (), R = (), E = Dismissal> {
    slot: Arc<Slot<V, R, E>>,
}

impl<V, R, E> AsyncModalState<V, R, E> {
    /// Create a closed modal state with the default overlap policy
    pub fn new() -> Self {
        Self::with_policy(OverlapPolicy::default())
    }

    /// Create a closed modal state with an explicit overlap policy
    pub fn with_policy(policy: OverlapPolicy) -> Self {
        let (state, _) = watch::channel(InteractionState::Closed);
        Self {
            slot: Arc::new(Slot {
                state,
                pending: Mutex::new(None),
                policy,
            }),
        }
    }

    /// Open the modal with `value` and return the result of the interaction
    pub fn show_modal(&self, value: V) -> DeferredResult<R, E> {
        let id = InteractionId::new();
        let (completer, receiver) = oneshot::channel();

        let mut pending = self.slot.pending.lock();
        let mut superseded = None;
        if let Some(previous) = pending.take() {
            match self.slot.policy {
                OverlapPolicy::Refuse => {
                    warn!(
                        "Refusing interaction {}: interaction {} is still pending",
                        id, previous.id
                    );
                    *pending = Some(previous);
                    let _ = completer.send(Err(InteractionError::Busy));
                    return DeferredResult::new(id, receiver);
                }
                OverlapPolicy::Supersede => {
                    debug!("Interaction {} superseded by {}", previous.id, id);
                    superseded = Some(previous);
                }
            }
        }

        let props = AsyncModalProps::new(id, value, Arc::downgrade(&self.slot));
        *pending = Some(PendingInteraction { id, completer });
        // Publish before completing so a woken caller never sees stale props.
        self.slot.state.send_replace(InteractionState::Open(props));
        if let Some(previous) = superseded {
            previous.complete(Err(InteractionError::Superseded));
        }
        drop(pending);

        debug!("Modal opened for interaction {}", id);
        DeferredResult::new(id, receiver)
    }

    /// Reject the pending interaction, if any, on behalf of the owner
    pub fn dismiss(&self, reason: E) -> bool {
        let current = self.slot.pending.lock().as_ref().map(|pending| pending.id);
        match current {
            Some(id) => self.slot.settle(id, Err(InteractionError::Rejected(reason))),
            None => false,
        }
    }

    /// Snapshot of the current state
    pub fn current(&self) -> InteractionState<V, R, E> {
        self.slot.state.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.slot.state.borrow().is_open()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> StateWatcher<V, R, E> {
        StateWatcher {
            receiver: self.slot.state.subscribe(),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.slot.policy
    }
}

impl<V, R, E> Default for AsyncModalState<V, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R, E> Clone for AsyncModalState<V, R, E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Receives every state published by an [`AsyncModalState`]
///
/// Changes published between two observations coalesce: the watcher only
/// ever sees the latest state.
pub struct StateWatcher<V, R, E = Dismissal> {
    receiver: watch::Receiver<InteractionState<V, R, E>>,
}

impl<V, R, E> StateWatcher<V, R, E> {
    /// Latest state, without marking it seen
    pub fn current(&self) -> InteractionState<V, R, E> {
        self.receiver.borrow().clone()
    }

    /// Whether a state was published since the last observation
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Latest state, marking it seen
    pub fn observe(&mut self) -> InteractionState<V, R, E> {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next published state.
    ///
    /// Returns `None` once every handle to the modal state is gone.
    pub async fn changed(&mut self) -> Option<InteractionState<V, R, E>> {
        self.receiver.changed().await.ok()?;
        Some(self.observe())
    }
}

impl<V, R, E> Clone for StateWatcher<V, R, E> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

/// Shared slot behind every handle of one modal state
pub(crate) struct Slot<V, R, E> {
    state: watch::Sender<InteractionState<V, R, E>>,
    pending: Mutex<Option<PendingInteraction<R, E>>>,
    policy: OverlapPolicy,
}

impl<V, R, E> Slot<V, R, E> {
    /// Settle interaction `id` and close the modal.
    ///
    /// Only the interaction currently pending can settle; anything older is a
    /// no-op so late callbacks never close a newer modal.
    pub(crate) fn settle(&self, id: InteractionId, outcome: Result<R, InteractionError<E>>) -> bool {
        let mut pending = self.pending.lock();
        let interaction = match pending.take() {
            Some(interaction) if interaction.id == id => interaction,
            other => {
                *pending = other;
                debug!("Ignoring settlement of inactive interaction {}", id);
                return false;
            }
        };

        let rejected = outcome.is_err();
        self.state.send_replace(InteractionState::Closed);
        interaction.complete(outcome);
        drop(pending);

        debug!(
            "Modal closed after interaction {} {}",
            id,
            if rejected { "rejected" } else { "resolved" }
        );
        true
    }

    pub(crate) fn is_pending(&self, id: InteractionId) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map_or(false, |pending| pending.id == id)
    }
}

/// One-shot settlement handle of the pending interaction
struct PendingInteraction<R, E> {
    id: InteractionId,
    completer: oneshot::Sender<Result<R, InteractionError<E>>>,
}

impl<R, E> PendingInteraction<R, E> {
    fn complete(self, outcome: Result<R, InteractionError<E>>) {
        if self.completer.send(outcome).is_err() {
            debug!("Interaction {} settled after its caller stopped waiting", self.id);
        }
    }
}
