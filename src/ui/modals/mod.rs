//! Modal components for user interaction
//!
//! Each view renders the props of a pending interaction and concludes it from
//! key events. A [`ModalSlot`] pairs a view with the modal state it draws, and
//! [`ModalHost`] owns the slots of the demo application.

pub mod confirmation;
pub mod input;
pub mod progress;

pub use confirmation::{ConfirmRequest, ConfirmationModal};
pub use input::{InputModal, InputRequest};
pub use progress::{ProgressHandle, ProgressModal, ProgressRequest};

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use tracing::debug;

use crate::{
    config::{ModalConfig, UIConfig},
    error::{AppResult, Dismissal},
    modal::{AsyncModalProps, AsyncModalState, InteractionId, OverlapPolicy, StateWatcher},
    ui::theme::Theme,
};

/// Props handed to the stock modal views
pub type ViewProps<M> =
    AsyncModalProps<<M as ModalView>::Value, <M as ModalView>::Output, Dismissal>;

/// Trait for modal views
pub trait ModalView {
    /// Invocation argument the view renders
    type Value;
    /// Result the view resolves with
    type Output;

    /// Render the open modal
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &AsyncModalProps<Self::Value, Self::Output, Dismissal>,
        theme: &Theme,
    );

    /// Handle key events, settling the interaction when the user is done
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        props: &AsyncModalProps<Self::Value, Self::Output, Dismissal>,
    ) -> AppResult<KeyOutcome>;

    /// Called once per host loop while open
    fn tick(&mut self, _props: &AsyncModalProps<Self::Value, Self::Output, Dismissal>) {}

    /// Whether the view needs redrawing without a state change
    fn is_animating(&self) -> bool {
        false
    }

    /// Forget view-local state before a new interaction is shown
    fn reset(&mut self) {}
}

/// What a view did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key means nothing to the view
    Ignored,
    /// The view updated its local state
    Handled,
    /// The view resolved or rejected the interaction
    Settled,
}

/// A view bound to the modal state it renders
pub struct ModalSlot<M: ModalView> {
    name: &'static str,
    state: AsyncModalState<M::Value, M::Output, Dismissal>,
    watcher: StateWatcher<M::Value, M::Output, Dismissal>,
    view: M,
    shown: Option<InteractionId>,
}

impl<M: ModalView> ModalSlot<M> {
    pub fn new(
        name: &'static str,
        state: AsyncModalState<M::Value, M::Output, Dismissal>,
        view: M,
    ) -> Self {
        let watcher = state.subscribe();
        Self {
            name,
            state,
            watcher,
            view,
            shown: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &AsyncModalState<M::Value, M::Output, Dismissal> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Consume a pending state change, returning whether one happened
    pub fn poll_changed(&mut self) -> bool {
        if !self.watcher.has_changed() {
            return false;
        }

        let state = self.watcher.observe();
        debug!(
            "Modal '{}' is now {}",
            self.name,
            if state.is_open() { "open" } else { "closed" }
        );
        true
    }

    pub fn needs_redraw(&self) -> bool {
        self.is_open() && self.view.is_animating()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(props) = self.open_props() {
            self.view.render(frame, area, &props, theme);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> AppResult<KeyOutcome> {
        match self.open_props() {
            Some(props) => self.view.handle_key_event(key, &props),
            None => Ok(KeyOutcome::Ignored),
        }
    }

    pub fn tick(&mut self) {
        if let Some(props) = self.open_props() {
            self.view.tick(&props);
        }
    }

    pub fn dismiss(&self, reason: Dismissal) -> bool {
        self.state.dismiss(reason)
    }

    /// Props of the open interaction, resetting the view when it is new
    fn open_props(&mut self) -> Option<ViewProps<M>> {
        let props = self.state.current().into_props()?;
        if self.shown != Some(props.id()) {
            self.view.reset();
            self.shown = Some(props.id());
        }
        Some(props)
    }
}

/// Cloneable handles to the demo application's modal states
///
/// Background tasks hold these to await interactions while the host renders
/// the same states.
#[derive(Clone)]
pub struct ModalHandles {
    pub confirm: AsyncModalState<ConfirmRequest, bool, Dismissal>,
    pub input: AsyncModalState<InputRequest, String, Dismissal>,
    pub progress: AsyncModalState<ProgressRequest, (), Dismissal>,
}

impl ModalHandles {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            confirm: AsyncModalState::with_policy(policy),
            input: AsyncModalState::with_policy(policy),
            progress: AsyncModalState::with_policy(policy),
        }
    }

    /// Reject every pending interaction
    pub fn dismiss_all(&self, reason: Dismissal) -> usize {
        [
            self.confirm.dismiss(reason.clone()),
            self.input.dismiss(reason.clone()),
            self.progress.dismiss(reason),
        ]
        .into_iter()
        .filter(|dismissed| *dismissed)
        .count()
    }
}

/// Owns the modal slots and routes rendering and keys to the open one
pub struct ModalHost {
    handles: ModalHandles,
    confirm: ModalSlot<ConfirmationModal>,
    input: ModalSlot<InputModal>,
    progress: ModalSlot<ProgressModal>,
    width_percent: u16,
    height_percent: u16,
}

impl ModalHost {
    pub fn new(modal_config: &ModalConfig, ui_config: &UIConfig) -> Self {
        let handles = ModalHandles::new(modal_config.overlap_policy);
        Self {
            confirm: ModalSlot::new("confirm", handles.confirm.clone(), ConfirmationModal::new()),
            input: ModalSlot::new("input", handles.input.clone(), InputModal::new()),
            progress: ModalSlot::new("progress", handles.progress.clone(), ProgressModal::new()),
            handles,
            width_percent: ui_config.modal_width_percent,
            height_percent: ui_config.modal_height_percent,
        }
    }

    pub fn handles(&self) -> ModalHandles {
        self.handles.clone()
    }

    pub fn any_open(&self) -> bool {
        self.confirm.is_open() || self.input.is_open() || self.progress.is_open()
    }

    /// Consume state changes of every slot, returning whether a redraw is due
    pub fn poll_changed(&mut self) -> bool {
        let confirm = self.confirm.poll_changed();
        let input = self.input.poll_changed();
        let progress = self.progress.poll_changed();

        confirm
            || input
            || progress
            || self.confirm.needs_redraw()
            || self.input.needs_redraw()
            || self.progress.needs_redraw()
    }

    pub fn tick(&mut self) {
        self.confirm.tick();
        self.input.tick();
        self.progress.tick();
    }

    /// Render every open modal centered in `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let modal_area = super::centered_rect(self.width_percent, self.height_percent, area);
        self.progress.render(frame, modal_area, theme);
        self.input.render(frame, modal_area, theme);
        self.confirm.render(frame, modal_area, theme);
    }

    /// Route a key to the topmost open modal
    pub fn handle_key_event(&mut self, key: KeyEvent) -> AppResult<KeyOutcome> {
        if self.confirm.is_open() {
            return self.confirm.handle_key_event(key);
        }
        if self.input.is_open() {
            return self.input.handle_key_event(key);
        }
        self.progress.handle_key_event(key)
    }

    pub fn dismiss_all(&self, reason: Dismissal) -> usize {
        self.handles.dismiss_all(reason)
    }
}
