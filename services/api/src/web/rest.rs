//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the note CRUD endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use crate::web::summarize;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use notes_core::domain::Note;
use notes_core::ports::ServiceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_notes_handler,
        create_note_handler,
        update_note_handler,
        delete_note_handler,
        summarize::summarize_handler,
        summarize::health_handler,
    ),
    components(
        schemas(
            NotePayload,
            CreateNoteRequest,
            UpdateNoteRequest,
            ErrorBody,
            summarize::SummarizeRequest,
            summarize::SummarizeResponse,
            summarize::HealthResponse,
        )
    ),
    tags(
        (name = "Notes API", description = "API endpoints for notes and AI summaries.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A note as it appears on the wire.
#[derive(Serialize, ToSchema)]
pub struct NotePayload {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub owner: Option<Uuid>,
}

impl From<Note> for NotePayload {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            summary: note.summary,
            owner: note.owner,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// Partial update payload. Exactly two shapes are accepted: `title` and
/// `content` together, or `summary` alone.
#[derive(Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
}

/// Generic error body shared by every endpoint.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps a port failure to its HTTP response, keeping the cause out of the
/// body for anything that is not the caller's fault.
pub(crate) fn service_error_response(e: &ServiceError, fallback: &str) -> Response {
    let (status, message) = match e {
        ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Note not found".to_string()),
        _ => {
            error!("Request failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, fallback.to_string())
        }
    };
    (status, Json(ErrorBody { error: message })).into_response()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List all notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, newest first", body = [NotePayload]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_notes_handler(State(app_state): State<Arc<AppState>>) -> Response {
    match app_state.store.list().await {
        Ok(notes) => {
            let payload: Vec<NotePayload> = notes.into_iter().map(NotePayload::from).collect();
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(e) => service_error_response(&e, "Failed to load notes"),
    }
}

/// Create a new note.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NotePayload),
        (status = 400, description = "Empty title or content", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match app_state.store.create(&payload.title, &payload.content).await {
        Ok(note) => (StatusCode::CREATED, Json(NotePayload::from(note))).into_response(),
        Err(e) => service_error_response(&e, "Failed to save note"),
    }
}

/// Update a note: title and content together, or the summary alone.
#[utoipa::path(
    patch,
    path = "/notes/{id}",
    request_body = UpdateNoteRequest,
    params(
        ("id" = i64, Path, description = "The note to update")
    ),
    responses(
        (status = 200, description = "Title and content updated", body = NotePayload),
        (status = 204, description = "Summary updated"),
        (status = 400, description = "Unsupported field combination", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn update_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    match (payload.title, payload.content, payload.summary) {
        (Some(title), Some(content), None) => {
            match app_state.store.update_content(id, &title, &content).await {
                Ok(note) => (StatusCode::OK, Json(NotePayload::from(note))).into_response(),
                Err(e) => service_error_response(&e, "Failed to save note"),
            }
        }
        (None, None, Some(summary)) => {
            if summary.trim().is_empty() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "Summary cannot be empty".to_string(),
                    }),
                )
                    .into_response();
            }
            match app_state.store.update_summary(id, &summary).await {
                Ok(()) => StatusCode::NO_CONTENT.into_response(),
                Err(e) => service_error_response(&e, "Failed to save summary"),
            }
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Update either title and content together, or summary alone".to_string(),
            }),
        )
            .into_response(),
    }
}

/// Delete a note. Deleting a note that is already gone is a success.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "The note to delete")
    ),
    responses(
        (status = 204, description = "Note deleted (or was already gone)"),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match app_state.store.delete(id).await {
        Ok(()) | Err(ServiceError::NotFound(_)) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response(&e, "Failed to delete note"),
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::app_router;
    use crate::web::tests_support::{state_with, MemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_and_list_round_trip() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store, None));

        let response = app
            .clone()
            .oneshot(
                Request::post("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"title":"Groceries","content":"milk, eggs"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["title"], "Groceries");
        assert!(created["summary"].is_null());

        let response = app
            .oneshot(Request::get("/notes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["content"], "milk, eggs");
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store.clone(), None));

        let response = app
            .oneshot(
                Request::post("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"   ","content":"body"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store, None));

        for (title, content) in [("A", "a"), ("B", "b"), ("C", "c")] {
            let body = format!(r#"{{"title":"{title}","content":"{content}"}}"#);
            let response = app
                .clone()
                .oneshot(
                    Request::post("/notes")
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(Request::get("/notes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        let titles: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn summary_update_goes_through_patch() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store.clone(), None));

        let response = app
            .clone()
            .oneshot(
                Request::post("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"T","content":"C"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::patch(format!("/notes/{id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"summary":"Short version."}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get("/notes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed[0]["summary"], "Short version.");
    }

    #[tokio::test]
    async fn mixed_update_shapes_are_rejected() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store, None));

        for body in [
            r#"{"title":"only title"}"#,
            r#"{"title":"t","content":"c","summary":"s"}"#,
            r#"{}"#,
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::patch("/notes/1")
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn updating_a_missing_note_is_404() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store, None));

        let response = app
            .oneshot(
                Request::patch("/notes/42")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"t","content":"c"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Note not found");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let app = app_router(state_with(store, None));

        let response = app
            .clone()
            .oneshot(
                Request::post("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"T","content":"C"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::delete(format!("/notes/{id}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = app
            .oneshot(Request::get("/notes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }
}
