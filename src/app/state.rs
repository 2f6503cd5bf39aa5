//! Application state management

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Number of activity entries kept for display
pub const ACTIVITY_CAPACITY: usize = 200;

/// Central application state
#[derive(Debug, Clone)]
pub struct AppState {
    lifecycle: LifecyclePhase,
    activity: VecDeque<ActivityEntry>,
    workflow: WorkflowStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            lifecycle: LifecyclePhase::Running,
            activity: VecDeque::with_capacity(ACTIVITY_CAPACITY),
            workflow: WorkflowStatus::Idle,
        }
    }

    pub fn should_quit(&self) -> bool {
        matches!(self.lifecycle, LifecyclePhase::Quitting { .. })
    }

    pub fn request_quit(&mut self) {
        if !self.should_quit() {
            self.lifecycle = LifecyclePhase::Quitting {
                requested_at: Utc::now(),
            };
        }
    }

    /// Append an activity entry, dropping the oldest past capacity
    pub fn push_activity(&mut self, level: ActivityLevel, message: impl Into<String>) {
        if self.activity.len() == ACTIVITY_CAPACITY {
            self.activity.pop_front();
        }
        self.activity.push_back(ActivityEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
    }

    pub fn activity(&self) -> impl DoubleEndedIterator<Item = &ActivityEntry> {
        self.activity.iter()
    }

    pub fn workflow(&self) -> &WorkflowStatus {
        &self.workflow
    }

    pub fn set_workflow(&mut self, status: WorkflowStatus) {
        self.workflow = status;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    Running,
    Quitting { requested_at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Running,
    Finished(String),
    Failed(String),
}

impl WorkflowStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkflowStatus::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub level: ActivityLevel,
    pub message: String,
}
