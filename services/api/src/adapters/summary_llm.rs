//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the summarizing LLM. It implements
//! the `SummarizationService` port from the `core` crate.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use notes_core::ports::{ServiceError, ServiceResult, SummarizationService};

/// Upper bound on the content forwarded to the completion service, to stay
/// inside the model's context window. Longer notes are summarized from their
/// leading excerpt.
const MAX_INPUT_CHARS: usize = 12_000;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for OpenAiSummaryAdapter {
    /// Generates a one-paragraph summary of the given note content, taking
    /// the first completion choice's text verbatim.
    async fn summarize(&self, content: &str) -> ServiceResult<String> {
        let excerpt: String = content.chars().take(MAX_INPUT_CHARS).collect();

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content("You are a helpful assistant that summarizes text concisely.")
                .build()
                .map_err(|e| ServiceError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Please summarize the following text in a brief paragraph: {}",
                    excerpt
                ))
                .build()
                .map_err(|e| ServiceError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| ServiceError::Summarization(e.to_string()))?;

        // A hung completion call becomes an ordinary failure instead of
        // pinning the dialog in its loading state forever.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                ServiceError::Summarization(format!(
                    "completion call timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e: OpenAIError| ServiceError::Summarization(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ServiceError::Summarization(
                    "completion response contained no text content".to_string(),
                )
            })
    }
}
