//! Modal state bound to a render callback

use super::{
    deferred::DeferredResult,
    manager::AsyncModalState,
    state::AsyncModalProps,
};
use crate::error::Dismissal;

/// Encapsulates the state of a modal UI element together with the function
/// that renders it.
///
/// [`render`](Self::render) yields nothing while the modal is closed and the
/// render callback's output while it is open. The callback receives the props
/// of the pending interaction, including the `resolve`/`reject` callbacks.
pub struct AsyncModal<F, V = (), R = (), E = Dismissal> {
    state: AsyncModalState<V, R, E>,
    render_modal: F,
}

impl<F, V, R, E> AsyncModal<F, V, R, E> {
    /// Create a closed modal rendered by `render_modal`
    pub fn new<T>(render_modal: F) -> Self
    where
        F: Fn(&AsyncModalProps<V, R, E>) -> T,
    {
        Self::from_state(AsyncModalState::new(), render_modal)
    }

    /// Bind a render callback to an existing modal state
    pub fn from_state(state: AsyncModalState<V, R, E>, render_modal: F) -> Self {
        Self {
            state,
            render_modal,
        }
    }

    /// Render the modal if it is open
    pub fn render<T>(&self) -> Option<T>
    where
        F: Fn(&AsyncModalProps<V, R, E>) -> T,
    {
        // Render from a snapshot so the callback may settle the interaction.
        let props = self.state.current().into_props()?;
        Some((self.render_modal)(&props))
    }

    /// Open the modal with `value`, see [`AsyncModalState::show_modal`]
    pub fn show_modal(&self, value: V) -> DeferredResult<R, E> {
        self.state.show_modal(value)
    }

    /// Underlying modal state, shared with any clones taken from it
    pub fn state(&self) -> &AsyncModalState<V, R, E> {
        &self.state
    }
}
