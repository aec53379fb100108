// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Server-sent event decoding for the OpenAI-compatible streaming API

use serde::Deserialize;

use crate::error::Result;
use crate::llm::provider::{StopReason, StreamEvent, Usage};

/// Incremental decoder turning raw response bytes into stream events.
///
/// Bytes are buffered until a full line is available so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    message_started: bool,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every event completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<StreamEvent>> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(line_end) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw);
            self.decode_line(line.trim(), &mut events);
        }

        events
    }

    /// Flush a trailing line that arrived without a newline
    pub fn finish(&mut self) -> Vec<Result<StreamEvent>> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).to_string();
            self.decode_line(line.trim(), &mut events);
        }
        if !self.finished && self.message_started {
            self.finished = true;
            events.push(Ok(StreamEvent::MessageStop));
        }
        events
    }

    fn decode_line(&mut self, line: &str, events: &mut Vec<Result<StreamEvent>>) {
        if line.is_empty() || line.starts_with(':') {
            return;
        }

        let Some(data) = line.strip_prefix("data:").map(str::trim) else {
            return;
        };

        if data == "[DONE]" {
            if !self.finished {
                self.finished = true;
                events.push(Ok(StreamEvent::MessageStop));
            }
            return;
        }

        if let Ok(error) = serde_json::from_str::<ErrorEnvelope>(data) {
            events.push(Ok(StreamEvent::Error {
                error_type: error.error.r#type.unwrap_or_else(|| "server_error".to_string()),
                message: error.error.message,
            }));
            return;
        }

        let chunk = match serde_json::from_str::<OaiStreamChunk>(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!("Skipping undecodable stream line: {} ({})", data, e);
                return;
            }
        };

        if !self.message_started {
            self.message_started = true;
            events.push(Ok(StreamEvent::MessageStart {
                id: chunk.id.clone().unwrap_or_default(),
                model: chunk.model.clone().unwrap_or_default(),
            }));
        }

        let usage = chunk.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        if let Some(choice) = chunk.choices.into_iter().next() {
            if let Some(text) = choice.delta.content {
                if !text.is_empty() {
                    events.push(Ok(StreamEvent::TextDelta { text }));
                }
            }

            if let Some(reason) = choice.finish_reason {
                events.push(Ok(StreamEvent::MessageDelta {
                    stop_reason: Some(StopReason::from_finish_reason(&reason)),
                    usage,
                }));
            }
        }
    }
}

// OpenAI-compatible streaming types (used by llama-server)

#[derive(Debug, Deserialize)]
struct OaiStreamChunk {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OaiStreamChoice>,
    usage: Option<OaiUsage>,
}

#[derive(Debug, Deserialize)]
struct OaiStreamChoice {
    delta: OaiStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaiStreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OaiUsage {
    pub(super) prompt_tokens: u32,
    pub(super) completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    r#type: Option<String>,
}
