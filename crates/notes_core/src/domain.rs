//! crates/notes_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user-authored note with an optional AI-generated summary.
///
/// `id` and `created_at` are assigned by the persistence backend and never
/// change afterwards. `summary` stays whatever it was when it was last saved
/// from the summary dialog, even if `content` is edited later.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    /// Creating user, when known. Present in the schema but not consulted by
    /// any access-control logic.
    pub owner: Option<Uuid>,
}

impl Note {
    /// True when the note carries a saved, non-empty summary.
    pub fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
