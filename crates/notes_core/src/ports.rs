//! crates/notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete persistence backend and the external
//! completion service.

use async_trait::async_trait;

use crate::domain::Note;

//=========================================================================================
// Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Each variant corresponds to one recovery path at the user-facing boundary:
/// validation failures are surfaced immediately and never retried
/// automatically, missing rows are soft failures, and store/summarization
/// failures are collapsed into a generic alert with the cause kept for logs.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller input violates a precondition (empty title/content, empty
    /// summarize body).
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The target row no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The persistence backend is unreachable or rejected the operation.
    #[error("Store operation failed: {0}")]
    Store(String),
    /// Contacting or parsing a response from the completion service failed.
    #[error("Summarization failed: {0}")]
    Summarization(String),
}

/// A convenience type alias for `Result<T, ServiceError>`.
pub type ServiceResult<T> = Result<T, ServiceError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// CRUD operations against the external note store.
///
/// Partial updates come in exactly the two shapes the application needs:
/// title and content together (the edit form) or the summary alone (the
/// summary dialog). `create` and `update_content` reject empty-after-trim
/// fields before touching the backend.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, newest first (`created_at` descending, id as tiebreak).
    async fn list(&self) -> ServiceResult<Vec<Note>>;

    async fn create(&self, title: &str, content: &str) -> ServiceResult<Note>;

    async fn update_content(&self, id: i64, title: &str, content: &str) -> ServiceResult<Note>;

    async fn update_summary(&self, id: i64, summary: &str) -> ServiceResult<()>;

    /// Fails with `NotFound` for a missing row; callers that want idempotent
    /// semantics treat that case as success.
    async fn delete(&self, id: i64) -> ServiceResult<()>;
}

/// Produces a single plain-text summary for a note's content.
#[async_trait]
pub trait SummarizationService: Send + Sync {
    async fn summarize(&self, content: &str) -> ServiceResult<String>;
}
