// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Local LLM provider using llama-server subprocess
//!
//! Starts llama-server as a subprocess (or attaches to one that is already
//! running) and communicates via the OpenAI-compatible HTTP API. This makes
//! local model inference opaque to the rest of Juno.

pub mod server;
pub mod sse;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ModelConfig;
use crate::error::{ApiError, JunoError, Result};
use crate::llm::message::Message;
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, EventStream, LlmProvider, StopReason, Usage,
};

use server::LlamaServer;
use sse::{OaiUsage, SseDecoder};

/// Where the OpenAI-compatible endpoint comes from
enum Endpoint {
    /// Juno owns a llama-server subprocess
    Managed(Arc<Mutex<Option<LlamaServer>>>),
    /// An already running server
    External(String),
}

/// Local LLM provider using llama-server
pub struct LocalProvider {
    endpoint: Endpoint,
    client: Client,
    config: ModelConfig,
    model_name: String,
}

impl LocalProvider {
    /// Create a provider from the model configuration.
    ///
    /// Nothing is started until [`LocalProvider::start`] or the first request.
    pub fn new(config: ModelConfig) -> Self {
        let endpoint = match &config.base_url {
            Some(url) => Endpoint::External(url.trim_end_matches('/').to_string()),
            None => Endpoint::Managed(Arc::new(Mutex::new(None))),
        };
        let model_name = config.model_name();

        Self {
            endpoint,
            client: Client::new(),
            config,
            model_name,
        }
    }

    /// Create a provider that talks to an existing server at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(ModelConfig {
            base_url: Some(base_url.into()),
            ..Default::default()
        })
    }

    /// Check the model artifact and bring the engine up.
    ///
    /// Called once at startup so an unusable engine is reported before the
    /// command loop begins.
    pub async fn start(&self) -> Result<()> {
        if let Endpoint::Managed(_) = self.endpoint {
            if !self.config.model_path.exists() {
                return Err(JunoError::Engine(format!(
                    "Model file not found: {}",
                    self.config.model_path.display()
                )));
            }
        }
        self.ensure_server().await.map(|_| ())
    }

    /// Ensure the llama-server subprocess is running, returning its base URL
    async fn ensure_server(&self) -> Result<String> {
        let server = match &self.endpoint {
            Endpoint::External(url) => return Ok(url.clone()),
            Endpoint::Managed(server) => server,
        };

        let mut guard = server.lock().await;

        // Check if server is already running
        if let Some(ref server) = *guard {
            if server.is_running() {
                return Ok(server.base_url());
            }
            tracing::warn!("llama-server is no longer running, restarting");
        }

        // Start a new server
        let server = LlamaServer::new(&self.config);
        server.start().await?;
        let url = server.base_url();
        *guard = Some(server);

        Ok(url)
    }

    /// Convert messages to OpenAI format
    fn convert_messages(&self, messages: &[Message]) -> Vec<OaiMessage> {
        messages
            .iter()
            .map(|m| OaiMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Build the request body
    fn build_request(&self, request: &CompletionRequest, stream: bool) -> OaiRequest {
        OaiRequest {
            model: self.model_name.clone(),
            messages: self.convert_messages(&request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop.clone(),
            stream,
        }
    }

    async fn post(&self, request: &CompletionRequest, stream: bool) -> Result<reqwest::Response> {
        let base_url = self.ensure_server().await?;
        let url = format!("{}/v1/chat/completions", base_url);
        let body = self.build_request(request, stream);

        tracing::debug!(
            "POST {} (stream={}, temperature={}, max_tokens={})",
            url,
            stream,
            body.temperature,
            body.max_tokens
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                JunoError::Api(ApiError::Network(format!(
                    "Failed to connect to local llama-server: {}",
                    e
                )))
            })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JunoError::Api(ApiError::ServerError {
                status,
                message: format!("Local llama-server error: {}", body),
            }));
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = self.post(&request, false).await?;

        let api_response: OaiResponse = response.json().await.map_err(|e| {
            JunoError::Api(ApiError::InvalidResponse(format!(
                "Failed to parse local server response: {}",
                e
            )))
        })?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            JunoError::Api(ApiError::InvalidResponse(
                "No choices in response".to_string(),
            ))
        })?;

        Ok(CompletionResponse {
            id: api_response.id.unwrap_or_default(),
            model: api_response
                .model
                .unwrap_or_else(|| self.model_name.clone()),
            text: choice.message.content.unwrap_or_default(),
            stop_reason: choice
                .finish_reason
                .as_deref()
                .map(StopReason::from_finish_reason),
            usage: api_response
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                })
                .unwrap_or_default(),
        })
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<EventStream> {
        let response = self.post(&request, true).await?;

        let byte_stream = response.bytes_stream();
        let decoder = Arc::new(std::sync::Mutex::new(SseDecoder::new()));
        let tail = Arc::clone(&decoder);

        let events = byte_stream
            .map(move |chunk| match chunk {
                Ok(bytes) => match decoder.lock() {
                    Ok(mut decoder) => decoder.push(&bytes),
                    Err(poisoned) => poisoned.into_inner().push(&bytes),
                },
                Err(e) => vec![Err(JunoError::Api(ApiError::StreamError(e.to_string())))],
            })
            .chain(futures::stream::once(async move {
                match tail.lock() {
                    Ok(mut decoder) => decoder.finish(),
                    Err(poisoned) => poisoned.into_inner().finish(),
                }
            }))
            .flat_map(futures::stream::iter);

        Ok(Box::pin(events))
    }
}

// OpenAI-compatible API types (used by llama-server)

#[derive(Debug, Serialize)]
struct OaiRequest {
    model: String,
    messages: Vec<OaiMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OaiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OaiResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OaiChoice>,
    usage: Option<OaiUsage>,
}

#[derive(Debug, Deserialize)]
struct OaiChoice {
    message: OaiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaiResponseMessage {
    content: Option<String>,
}
