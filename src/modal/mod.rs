//! Awaitable modal interactions
//!
//! A modal slot is either closed or open with the props of one pending
//! interaction. [`AsyncModalState::show_modal`] opens the slot and returns a
//! [`DeferredResult`]; the UI renders the published props and concludes the
//! interaction with their `resolve` or `reject` callback, which settles the
//! deferred result and closes the slot.
//!
//! ```no_run
//! use async_modal::modal::AsyncModalState;
//!
//! # async fn example() {
//! let confirm: AsyncModalState<String, bool> = AsyncModalState::new();
//! let mut watcher = confirm.subscribe();
//!
//! let answer = confirm.show_modal("Delete branch?".to_string());
//!
//! // Somewhere in the UI layer:
//! if let Some(state) = watcher.changed().await {
//!     if let Some(props) = state.props() {
//!         props.resolve(true);
//!     }
//! }
//!
//! assert_eq!(answer.await, Ok(true));
//! # }
//! ```

pub mod binding;
pub mod deferred;
pub mod manager;
pub mod state;

pub use binding::AsyncModal;
pub use deferred::DeferredResult;
pub use manager::{AsyncModalState, OverlapPolicy, StateWatcher};
pub use state::{AsyncModalProps, InteractionId, InteractionState};
