// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Streaming response handling
//!
//! This module provides testable logic for processing streaming LLM responses.
//! It separates the stream processing logic from the actual I/O operations.

use futures::StreamExt;

use crate::cancel::CancelSignal;
use crate::error::{ApiError, JunoError, Result};
use crate::llm::provider::{CompletionRequest, LlmProvider, StopReason, StreamEvent, Usage};

/// Accumulator for streaming response text
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Text received so far
    text: String,
    /// Stop reason from the stream
    stop_reason: Option<StopReason>,
    /// Token usage, when the server reports it
    usage: Option<Usage>,
    /// Number of text deltas received
    delta_count: usize,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn delta_count(&self) -> usize {
        self.delta_count
    }

    /// Process a stream event and report what it was
    pub fn process_event(&mut self, event: StreamEvent) -> StreamEventResult {
        match event {
            StreamEvent::MessageStart { .. } => StreamEventResult::MessageStart,
            StreamEvent::TextDelta { text } => {
                if text.is_empty() {
                    return StreamEventResult::Ignored;
                }
                self.text.push_str(&text);
                self.delta_count += 1;
                StreamEventResult::TextDelta(text)
            }
            StreamEvent::MessageDelta { stop_reason, usage } => {
                self.stop_reason = stop_reason.or(self.stop_reason);
                if usage.is_some() {
                    self.usage = usage;
                }
                StreamEventResult::MessageDelta(stop_reason)
            }
            StreamEvent::MessageStop => StreamEventResult::MessageStop,
            StreamEvent::Error {
                error_type,
                message,
            } => StreamEventResult::Error {
                error_type,
                message,
            },
        }
    }

    /// Consume the accumulator and return the final response
    pub fn finish(self) -> StreamedResponse {
        StreamedResponse {
            text: self.text,
            stop_reason: self.stop_reason,
            usage: self.usage,
        }
    }
}

/// Result of processing a stream event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEventResult {
    MessageStart,
    /// Text delta received (contains the new text)
    TextDelta(String),
    MessageDelta(Option<StopReason>),
    MessageStop,
    /// Error reported by the server
    Error { error_type: String, message: String },
    /// Event carried nothing
    Ignored,
}

/// Final state of a model call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamedResponse {
    pub text: String,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<Usage>,
}

/// Stream a completion, calling `on_text` with the accumulated text after
/// every delta.
///
/// Returns [`JunoError::Cancelled`] as soon as `cancel` is raised.
pub async fn collect_stream<F>(
    provider: &dyn LlmProvider,
    request: CompletionRequest,
    cancel: &CancelSignal,
    mut on_text: F,
) -> Result<StreamedResponse>
where
    F: FnMut(&str),
{
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JunoError::Cancelled),
        stream = provider.complete_stream(request) => stream?,
    };

    let mut accumulator = StreamAccumulator::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JunoError::Cancelled),
            next = stream.next() => next,
        };

        let Some(event) = next else {
            break;
        };

        match accumulator.process_event(event?) {
            StreamEventResult::TextDelta(_) => on_text(accumulator.text()),
            StreamEventResult::Error {
                error_type,
                message,
            } => {
                return Err(JunoError::Api(ApiError::StreamError(format!(
                    "{}: {}",
                    error_type, message
                ))));
            }
            StreamEventResult::MessageStop => break,
            _ => {}
        }
    }

    tracing::debug!(
        "Stream finished after {} deltas ({} chars, stop reason {:?})",
        accumulator.delta_count(),
        accumulator.text().len(),
        accumulator.stop_reason()
    );

    Ok(accumulator.finish())
}

/// Batched completion, abandoned as soon as `cancel` is raised
pub async fn collect_complete(
    provider: &dyn LlmProvider,
    request: CompletionRequest,
    cancel: &CancelSignal,
) -> Result<StreamedResponse> {
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JunoError::Cancelled),
        response = provider.complete(request) => response?,
    };

    Ok(StreamedResponse {
        text: response.text,
        stop_reason: response.stop_reason,
        usage: Some(response.usage),
    })
}
