//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use notes_core::ports::{NoteStore, SummarizationService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    /// Absent when no completion-service credential was configured; the
    /// summarize endpoint then fails with the generic error and `/healthz`
    /// reports the missing key.
    pub summarizer: Option<Arc<dyn SummarizationService>>,
    pub config: Arc<Config>,
}
