//! Error handling for async-modal
//!
//! Two families of errors live here:
//! - [`InteractionError`] settles a pending modal interaction that did not
//!   complete with a result. It is generic over the rejection reason so the
//!   modal UI can forward whatever it likes to the awaiting caller.
//! - [`AppError`] covers the host application: terminal, configuration and
//!   I/O failures.

use std::fmt;

use thiserror::Error;

/// Application result type alias
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Outcome of awaiting a modal interaction
pub type InteractionResult<R, E = Dismissal> = std::result::Result<R, InteractionError<E>>;

/// Failure settlement of a modal interaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError<E> {
    /// The modal UI rejected the interaction with a caller supplied reason
    #[error("interaction rejected: {0}")]
    Rejected(E),

    /// A newer `show_modal` call replaced this interaction
    #[error("interaction superseded by a newer request")]
    Superseded,

    /// `show_modal` was refused because another interaction is pending
    #[error("modal is busy with another interaction")]
    Busy,

    /// The owning modal state went away before the interaction settled
    #[error("modal state dropped before the interaction settled")]
    Dropped,
}

impl<E> InteractionError<E> {
    /// Whether the modal UI rejected the interaction
    pub fn is_rejection(&self) -> bool {
        matches!(self, InteractionError::Rejected(_))
    }

    /// Borrow the rejection reason, if any
    pub fn reason(&self) -> Option<&E> {
        match self {
            InteractionError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    /// Take the rejection reason, if any
    pub fn into_reason(self) -> Option<E> {
        match self {
            InteractionError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Conventional rejection reasons used by the stock terminal modals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Dismissal {
    /// The user backed out of the modal
    #[error("cancelled by user")]
    Cancelled,

    /// The host closed the modal, e.g. on shutdown
    #[error("closed by host")]
    Closed,

    /// Any other reason
    #[error("{0}")]
    Other(String),
}

/// Main application error enum
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration values failed validation
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Terminal/UI operation errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A modal interaction ended without a result
    #[error("Interaction error: {message}")]
    Interaction { message: String },

    /// Application state errors
    #[error("State error: {message}")]
    State { message: String },

    /// Generic application errors
    #[error("Application error: {message}")]
    Application { message: String },
}

impl AppError {
    /// Create a new Config error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new State error
    pub fn state<S: Into<String>>(message: S) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a new Application error
    pub fn application<S: Into<String>>(message: S) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Io(_) => false,
            AppError::ConfigParse(_) => false,
            AppError::ConfigSerialize(_) => false,
            AppError::Config { .. } => false,
            AppError::Terminal(_) => false,
            AppError::Interaction { .. } => true,
            AppError::State { .. } => true,
            AppError::Application { .. } => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Io(_) => ErrorSeverity::High,
            AppError::ConfigParse(_) => ErrorSeverity::High,
            AppError::ConfigSerialize(_) => ErrorSeverity::Medium,
            AppError::Config { .. } => ErrorSeverity::High,
            AppError::Terminal(_) => ErrorSeverity::Critical,
            AppError::Interaction { .. } => ErrorSeverity::Low,
            AppError::State { .. } => ErrorSeverity::Medium,
            AppError::Application { .. } => ErrorSeverity::Medium,
        }
    }
}

impl<E: fmt::Display> From<InteractionError<E>> for AppError {
    fn from(error: InteractionError<E>) -> Self {
        Self::Interaction {
            message: error.to_string(),
        }
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Convert severity to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Low => "LOW",
            ErrorSeverity::Medium => "MEDIUM",
            ErrorSeverity::High => "HIGH",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}
