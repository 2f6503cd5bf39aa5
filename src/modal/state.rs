//! Interaction state published by [`AsyncModalState`](super::AsyncModalState)

use chrono::{DateTime, Utc};
use std::{
    fmt,
    future::Future,
    sync::{Arc, Weak},
};
use uuid::Uuid;

use super::manager::Slot;
use crate::error::{Dismissal, InteractionError};

/// Identifier of a single `show_modal` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionId(Uuid);

impl InteractionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a modal is closed, or open with the props of its pending interaction
pub enum InteractionState<V, R, E = Dismissal> {
    Closed,
    Open(AsyncModalProps<V, R, E>),
}

impl<V, R, E> InteractionState<V, R, E> {
    pub fn is_open(&self) -> bool {
        matches!(self, InteractionState::Open(_))
    }

    pub fn props(&self) -> Option<&AsyncModalProps<V, R, E>> {
        match self {
            InteractionState::Open(props) => Some(props),
            InteractionState::Closed => None,
        }
    }

    pub fn into_props(self) -> Option<AsyncModalProps<V, R, E>> {
        match self {
            InteractionState::Open(props) => Some(props),
            InteractionState::Closed => None,
        }
    }

    /// Invocation argument of the pending interaction
    pub fn value(&self) -> Option<&V> {
        self.props().map(AsyncModalProps::value)
    }

    pub fn interaction_id(&self) -> Option<InteractionId> {
        self.props().map(AsyncModalProps::id)
    }
}

impl<V, R, E> Default for InteractionState<V, R, E> {
    fn default() -> Self {
        InteractionState::Closed
    }
}

impl<V, R, E> Clone for InteractionState<V, R, E> {
    fn clone(&self) -> Self {
        match self {
            InteractionState::Closed => InteractionState::Closed,
            InteractionState::Open(props) => InteractionState::Open(props.clone()),
        }
    }
}

impl<V: fmt::Debug, R, E> fmt::Debug for InteractionState<V, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionState::Closed => f.write_str("Closed"),
            InteractionState::Open(props) => f.debug_tuple("Open").field(props).finish(),
        }
    }
}

/// Invocation argument plus the callbacks that conclude the interaction
///
/// Props are cheap to clone: the value is shared and the callbacks hold a
/// weak reference back to the modal state. Every clone settles the same
/// interaction, and only the first `resolve` or `reject` has any effect.
pub struct AsyncModalProps<V, R, E = Dismissal> {
    id: InteractionId,
    value: Arc<V>,
    opened_at: DateTime<Utc>,
    slot: Weak<Slot<V, R, E>>,
}

impl<V, R, E> AsyncModalProps<V, R, E> {
    pub(crate) fn new(id: InteractionId, value: V, slot: Weak<Slot<V, R, E>>) -> Self {
        Self {
            id,
            value: Arc::new(value),
            opened_at: Utc::now(),
            slot,
        }
    }

    pub fn id(&self) -> InteractionId {
        self.id
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Complete the interaction with `result`.
    ///
    /// Returns `false` when the interaction had already settled, was
    /// superseded, or its modal state no longer exists.
    pub fn resolve(&self, result: R) -> bool {
        self.settle(Ok(result))
    }

    /// Complete the interaction with the output of `result` once it is ready.
    ///
    /// The modal stays open while `result` is pending. Returns `false` under
    /// the same conditions as [`resolve`](Self::resolve), checked after
    /// `result` completes.
    pub async fn resolve_with<F>(&self, result: F) -> bool
    where
        F: Future<Output = R>,
    {
        let result = result.await;
        self.resolve(result)
    }

    /// Fail the interaction with `reason`.
    ///
    /// Returns `false` under the same conditions as [`resolve`](Self::resolve).
    pub fn reject(&self, reason: E) -> bool {
        self.settle(Err(InteractionError::Rejected(reason)))
    }

    /// Whether this interaction is still waiting for a result
    pub fn is_pending(&self) -> bool {
        self.slot
            .upgrade()
            .map_or(false, |slot| slot.is_pending(self.id))
    }

    fn settle(&self, outcome: Result<R, InteractionError<E>>) -> bool {
        match self.slot.upgrade() {
            Some(slot) => slot.settle(self.id, outcome),
            None => false,
        }
    }
}

impl<V, R, E> Clone for AsyncModalProps<V, R, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            opened_at: self.opened_at,
            slot: Weak::clone(&self.slot),
        }
    }
}

impl<V: fmt::Debug, R, E> fmt::Debug for AsyncModalProps<V, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncModalProps")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("opened_at", &self.opened_at)
            .finish_non_exhaustive()
    }
}
