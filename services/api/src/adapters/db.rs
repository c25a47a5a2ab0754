//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `NoteStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::domain::Note;
use notes_core::ports::{NoteStore, ServiceError, ServiceResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `NoteStore` port.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Creates a new `PgNoteStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Rejects empty-after-trim fields before the backend is contacted.
fn require_fields(title: &str, content: &str) -> ServiceResult<()> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

fn store_error(e: sqlx::Error) -> ServiceError {
    ServiceError::Store(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct NoteRecord {
    id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    summary: Option<String>,
    owner: Option<Uuid>,
}

impl NoteRecord {
    fn into_domain(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            summary: self.summary,
            owner: self.owner,
        }
    }
}

//=========================================================================================
// `NoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self) -> ServiceResult<Vec<Note>> {
        // Id as tiebreak keeps same-instant rows in a stable order.
        let records = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, created_at, summary, owner \
             FROM notes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(records.into_iter().map(NoteRecord::into_domain).collect())
    }

    async fn create(&self, title: &str, content: &str) -> ServiceResult<Note> {
        require_fields(title, content)?;

        let record = sqlx::query_as::<_, NoteRecord>(
            "INSERT INTO notes (title, content) VALUES ($1, $2) \
             RETURNING id, title, content, created_at, summary, owner",
        )
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(record.into_domain())
    }

    async fn update_content(&self, id: i64, title: &str, content: &str) -> ServiceResult<Note> {
        require_fields(title, content)?;

        let record = sqlx::query_as::<_, NoteRecord>(
            "UPDATE notes SET title = $1, content = $2 WHERE id = $3 \
             RETURNING id, title, content, created_at, summary, owner",
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Note {} not found", id)))?;

        Ok(record.into_domain())
    }

    async fn update_summary(&self, id: i64, summary: &str) -> ServiceResult<()> {
        let result = sqlx::query("UPDATE notes SET summary = $1 WHERE id = $2")
            .bind(summary)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_rejected_before_any_query() {
        assert!(matches!(
            require_fields("", "body"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_fields("title", "   "),
            Err(ServiceError::Validation(_))
        ));
        assert!(require_fields("title", "body").is_ok());
    }
}
