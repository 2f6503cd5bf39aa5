//! async-modal - awaitable modal interactions for terminal user interfaces
//!
//! Showing a modal returns a future that settles when the user completes or
//! cancels the interaction, while the rendering layer redraws from a published
//! open/closed state.
//!
//! # Architecture
//!
//! - **Modal layer** ([`modal`]): the state manager, its deferred results and
//!   the render binding. Independent of any UI toolkit.
//! - **Presentation layer** ([`ui`]): ratatui views for confirmation, input
//!   and progress modals.
//! - **Application layer** ([`app`]): the demo terminal host, a headless
//!   auto-responder and a scripted workflow that awaits modals.

pub mod app;
pub mod config;
pub mod error;
pub mod modal;
pub mod ui;

pub use app::App;
pub use error::{AppError, AppResult, Dismissal, InteractionError, InteractionResult};
pub use modal::{AsyncModal, AsyncModalProps, AsyncModalState, DeferredResult, InteractionState};

use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "async_modal=info";

/// Initialize the logging system
///
/// Logs go to `log_file` when given, which keeps the terminal UI intact, and
/// to stderr otherwise. The filter comes from `RUST_LOG`.
pub fn initialize_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
