// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM Provider trait and related types
//!
//! Defines the abstraction layer over the inference backend.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::Result;
use crate::llm::message::Message;

/// Boxed stream of events produced by a streaming completion
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Main trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "local")
    fn name(&self) -> &str;

    /// Name of the loaded model
    fn model_name(&self) -> &str;

    /// Non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Streaming completion
    async fn complete_stream(&self, request: CompletionRequest) -> Result<EventStream>;
}

/// Request for completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Messages in order, system first
    pub messages: Vec<Message>,

    /// Maximum tokens in response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Literal strings that end generation early
    pub stop: Vec<String>,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response ID
    pub id: String,

    /// Model used
    pub model: String,

    /// Generated text
    pub text: String,

    /// Stop reason
    pub stop_reason: Option<StopReason>,

    /// Token usage
    pub usage: Usage,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of message or a stop sequence
    EndTurn,
    /// Hit max tokens
    MaxTokens,
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "length" => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
}

/// Events from a streaming response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Start of message
    MessageStart { id: String, model: String },

    /// Newly generated text
    TextDelta { text: String },

    /// Message delta (stop reason, usage)
    MessageDelta {
        stop_reason: Option<StopReason>,
        usage: Option<Usage>,
    },

    /// End of message
    MessageStop,

    /// Error reported inside the stream
    Error { error_type: String, message: String },
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: 2048,
            temperature: 0.7,
            stop: Vec::new(),
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new(vec![Message::user("hi")])
            .with_max_tokens(100)
            .with_temperature(0.1)
            .with_stop(["###", "User:"]);

        assert_eq!(request.max_tokens, 100);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.stop, vec!["###".to_string(), "User:".to_string()]);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_completion_request_defaults() {
        let request = CompletionRequest::new(vec![]);
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, 0.7);
        assert!(request.stop.is_empty());
    }

    #[test]
    fn test_stop_reason_from_finish_reason() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(
            StopReason::from_finish_reason("length"),
            StopReason::MaxTokens
        );
        assert_eq!(
            StopReason::from_finish_reason("something_else"),
            StopReason::EndTurn
        );
    }
}
