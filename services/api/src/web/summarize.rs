//! services/api/src/web/summarize.rs
//!
//! The summarization gateway: a single-purpose handler that forwards note
//! content to the completion service, plus the credential diagnostic.

use crate::web::rest::ErrorBody;
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SummarizeRequest {
    /// The note content to summarize. A missing field is treated as empty.
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
}

/// Generate a summary for the supplied content.
///
/// Every downstream failure collapses into one generic 500 body; the specific
/// cause is logged server-side only, so callers treat all failures identically
/// and retry by re-requesting.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummarizeResponse),
        (status = 400, description = "Missing or empty content", body = ErrorBody),
        (status = 500, description = "Completion service failure", body = ErrorBody)
    )
)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SummarizeRequest>,
) -> Response {
    if payload.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Content is required".to_string(),
            }),
        )
            .into_response();
    }

    let failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Failed to generate summary".to_string(),
            }),
        )
            .into_response()
    };

    let Some(summarizer) = app_state.summarizer.as_ref() else {
        error!("Summarize request received but no completion-service credential is configured");
        return failed();
    };

    match summarizer.summarize(&payload.content).await {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse { summary })).into_response(),
        Err(e) => {
            error!("Error generating summary: {:?}", e);
            failed()
        }
    }
}

/// Report whether the completion-service credential is configured, without
/// leaking its value.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Credential diagnostic", body = HealthResponse)
    )
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let configured = app_state.config.openai_api_key.is_some();
    Json(HealthResponse {
        success: configured,
        message: if configured {
            "API key is configured".to_string()
        } else {
            "API key is missing".to_string()
        },
    })
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::app_router;
    use crate::web::tests_support::{state_with, state_with_key, MemoryStore, StubSummarizer};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_summarize(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::post("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_content_is_a_400() {
        let app = app_router(state_with(MemoryStore::new(), Some(StubSummarizer::ok("s"))));
        let (status, body) = post_summarize(app, r#"{"content": ""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn missing_content_is_a_400() {
        let app = app_router(state_with(MemoryStore::new(), Some(StubSummarizer::ok("s"))));
        let (status, body) = post_summarize(app, r#"{}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn success_returns_the_first_choice_verbatim() {
        let app = app_router(state_with(
            MemoryStore::new(),
            Some(StubSummarizer::ok("Buy milk and eggs.")),
        ));
        let (status, body) = post_summarize(app, r#"{"content": "milk, eggs"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "Buy milk and eggs.");
    }

    #[tokio::test]
    async fn downstream_failures_collapse_to_one_generic_error() {
        let app = app_router(state_with(
            MemoryStore::new(),
            Some(StubSummarizer::failing("401 invalid api key")),
        ));
        let (status, body) = post_summarize(app, r#"{"content": "milk, eggs"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate summary");
        // The cause never reaches the caller.
        assert!(!body.to_string().contains("invalid api key"));
    }

    #[tokio::test]
    async fn missing_credential_also_collapses_to_the_generic_error() {
        let app = app_router(state_with(MemoryStore::new(), None));
        let (status, body) = post_summarize(app, r#"{"content": "milk, eggs"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate summary");
    }

    #[tokio::test]
    async fn healthz_reports_credential_presence() {
        let app = app_router(state_with_key(MemoryStore::new(), Some("sk-test")));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "API key is configured");
        // The key itself never appears in the response.
        assert!(!body.to_string().contains("sk-test"));

        let app = app_router(state_with_key(MemoryStore::new(), None));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "API key is missing");
    }
}
