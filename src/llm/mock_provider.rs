// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock LLM provider for testing
//!
//! Provides a configurable mock implementation of the LlmProvider trait
//! that can be used in tests without a running inference engine.

use async_trait::async_trait;
use futures::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{ApiError, JunoError, Result};
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, EventStream, LlmProvider, StopReason, StreamEvent,
    Usage,
};

/// A mock LLM provider for testing
#[derive(Clone)]
pub struct MockProvider {
    /// Provider name
    name: String,
    /// Configured responses
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A pre-configured response for the mock provider
#[derive(Clone, Debug)]
pub struct MockResponse {
    /// Pieces the text is streamed in
    pub chunks: Vec<String>,
    /// Fail before producing anything
    pub fail_request: Option<String>,
    /// Fail after the chunks have been streamed
    pub fail_stream: Option<String>,
    /// Stop reason
    pub stop_reason: StopReason,
    /// Token usage
    pub usage: Usage,
}

impl MockResponse {
    /// Full response text
    pub fn text(&self) -> String {
        self.chunks.concat()
    }

    fn from_text(text: impl Into<String>) -> Self {
        Self {
            chunks: split_chunks(&text.into()),
            ..Default::default()
        }
    }
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            chunks: vec!["Mock response".to_string()],
            fail_request: None,
            fail_stream: None,
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
        }
    }
}

/// Stream the text in ten-character pieces
fn split_chunks(text: &str) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(10)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Mock provider lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Arc::new(Mutex::new(vec![MockResponse::default()])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    fn replace(self, items: Vec<MockResponse>) -> Self {
        {
            let mut responses = lock(&self.responses);
            responses.clear();
            responses.extend(items);
        }
        self
    }

    /// Set the text response
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.replace(vec![MockResponse::from_text(text)])
    }

    /// Queue multiple responses (returned in order)
    pub fn with_responses(self, texts: Vec<String>) -> Self {
        self.replace(texts.into_iter().map(MockResponse::from_text).collect())
    }

    /// Stream the response in exactly these pieces
    pub fn with_chunks(self, chunks: Vec<String>) -> Self {
        self.replace(vec![MockResponse {
            chunks,
            ..Default::default()
        }])
    }

    /// Fail the request before any text is produced
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.replace(vec![MockResponse {
            chunks: vec![],
            fail_request: Some(message.into()),
            ..Default::default()
        }])
    }

    /// Stream some text, then fail mid-stream
    pub fn with_stream_error(self, partial: impl Into<String>, message: impl Into<String>) -> Self {
        self.replace(vec![MockResponse {
            chunks: split_chunks(&partial.into()),
            fail_stream: Some(message.into()),
            ..Default::default()
        }])
    }

    /// Get the number of times the model was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        lock(&self.recorded_requests).clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.recorded_requests).last().cloned()
    }

    /// Reset call count and recorded requests
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock(&self.recorded_requests).clear();
    }

    /// Record the request and pick the next response
    fn next_response(&self, request: &CompletionRequest) -> Result<MockResponse> {
        lock(&self.recorded_requests).push(request.clone());
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = lock(&self.responses);
        // Cycle through responses or return the last one
        let response = if responses.is_empty() {
            MockResponse::default()
        } else {
            responses[count.min(responses.len() - 1)].clone()
        };

        match &response.fail_request {
            Some(message) => Err(JunoError::Api(ApiError::Network(message.clone()))),
            None => Ok(response),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = self.next_response(&request)?;

        if let Some(message) = response.fail_stream {
            return Err(JunoError::Api(ApiError::StreamError(message)));
        }

        Ok(CompletionResponse {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            model: self.model_name().to_string(),
            text: response.text(),
            stop_reason: Some(response.stop_reason),
            usage: response.usage,
        })
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<EventStream> {
        let response = self.next_response(&request)?;

        let mut events = vec![Ok(StreamEvent::MessageStart {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            model: self.model_name().to_string(),
        })];

        for text in response.chunks {
            events.push(Ok(StreamEvent::TextDelta { text }));
        }

        if let Some(message) = response.fail_stream {
            events.push(Err(JunoError::Api(ApiError::StreamError(message))));
            return Ok(Box::pin(stream::iter(events)));
        }

        events.push(Ok(StreamEvent::MessageDelta {
            stop_reason: Some(response.stop_reason),
            usage: Some(response.usage),
        }));
        events.push(Ok(StreamEvent::MessageStop));

        Ok(Box::pin(stream::iter(events)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Message;
    use futures::StreamExt;

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![Message::user("Hello")])
    }

    #[test]
    fn test_mock_provider_creation() {
        let provider = MockProvider::new();
        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_complete() {
        let provider = MockProvider::new().with_response("Test response");
        let response = provider.complete(request()).await.unwrap();

        assert_eq!(response.text, "Test response");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_records_requests() {
        let provider = MockProvider::new();
        provider.complete(request()).await.unwrap();

        let recorded = provider.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].messages[0].content, "Hello");

        provider.reset();
        assert_eq!(provider.call_count(), 0);
        assert!(provider.last_request().is_none());
    }

    #[tokio::test]
    async fn test_mock_provider_multiple_responses() {
        let provider = MockProvider::new()
            .with_responses(vec!["First".to_string(), "Second".to_string()]);

        let r1 = provider.complete(request()).await.unwrap();
        let r2 = provider.complete(request()).await.unwrap();
        let r3 = provider.complete(request()).await.unwrap();

        assert_eq!(r1.text, "First");
        assert_eq!(r2.text, "Second");
        // Stays on last response
        assert_eq!(r3.text, "Second");
    }

    #[tokio::test]
    async fn test_mock_provider_stream_chunks() {
        let provider =
            MockProvider::new().with_chunks(vec!["def ".to_string(), "f(): pass".to_string()]);
        let events: Vec<_> = provider
            .complete_stream(request())
            .await
            .unwrap()
            .collect()
            .await;

        let texts: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                Ok(StreamEvent::TextDelta { text }) => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["def ", "f(): pass"]);
        assert!(matches!(events.last(), Some(Ok(StreamEvent::MessageStop))));
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::new().with_error("engine down");
        assert!(provider.complete_stream(request()).await.is_err());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_stream_error_after_text() {
        let provider = MockProvider::new().with_stream_error("partial", "connection reset");
        let events: Vec<_> = provider
            .complete_stream(request())
            .await
            .unwrap()
            .collect()
            .await;
        assert!(matches!(events.last(), Some(Err(_))));
    }
}
