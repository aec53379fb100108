// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! llama-server subprocess manager
//!
//! Manages the lifecycle of a llama-server process for local LLM inference.
//! The server exposes an OpenAI-compatible API on a local port.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::config::ModelConfig;
use crate::error::{JunoError, Result};

const HEALTH_POLL_INTERVAL_MS: u64 = 500;
const HEALTH_TIMEOUT_SECS: u64 = 120;

/// Manages a llama-server subprocess
pub struct LlamaServer {
    process: Mutex<Option<Child>>,
    port: u16,
    model_path: PathBuf,
    binary_path: PathBuf,
    gpu_layers: i32,
    ctx_size: u32,
    threads: u32,
    chat_template: String,
}

impl LlamaServer {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            process: Mutex::new(None),
            port: config.port,
            model_path: config.model_path.clone(),
            binary_path: config.server_binary.clone(),
            gpu_layers: config.gpu_layers,
            ctx_size: config.context_size,
            threads: config.threads,
            chat_template: config.chat_format.clone(),
        }
    }

    /// Command-line arguments passed to llama-server
    pub fn args(&self) -> Vec<String> {
        vec![
            "--model".to_string(),
            self.model_path.display().to_string(),
            "--port".to_string(),
            self.port.to_string(),
            "--host".to_string(),
            "127.0.0.1".to_string(),
            "--n-gpu-layers".to_string(),
            self.gpu_layers.to_string(),
            "--ctx-size".to_string(),
            self.ctx_size.to_string(),
            "--threads".to_string(),
            self.threads.to_string(),
            "--chat-template".to_string(),
            self.chat_template.clone(),
        ]
    }

    /// Start the llama-server subprocess
    pub async fn start(&self) -> Result<()> {
        // Check if already running
        if self.is_running() {
            return Ok(());
        }

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(self.args());

        // Suppress output from the server process
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            JunoError::Engine(format!(
                "Failed to start llama-server at {}: {}",
                self.binary_path.display(),
                e
            ))
        })?;

        match self.process.lock() {
            Ok(mut guard) => *guard = Some(child),
            Err(poisoned) => *poisoned.into_inner() = Some(child),
        }

        // Wait for server to be ready
        self.wait_for_ready().await?;

        tracing::info!(
            "llama-server started on port {} with model {}",
            self.port,
            self.model_path.display()
        );

        Ok(())
    }

    /// Wait for the server's /health endpoint to respond
    async fn wait_for_ready(&self) -> Result<()> {
        let client = reqwest::Client::new();
        let url = format!("{}/health", self.base_url());
        let max_attempts = (HEALTH_TIMEOUT_SECS * 1000 / HEALTH_POLL_INTERVAL_MS) as usize;

        for _ in 0..max_attempts {
            // Check if process is still alive
            if !self.is_running() {
                return Err(JunoError::Engine(
                    "llama-server process exited unexpectedly during startup".to_string(),
                ));
            }

            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }

            tokio::time::sleep(tokio::time::Duration::from_millis(HEALTH_POLL_INTERVAL_MS)).await;
        }

        // Kill the process if it didn't become ready
        self.shutdown();
        Err(JunoError::Engine(format!(
            "llama-server failed to start within {} seconds. \
             The model may be too large for your system's memory.",
            HEALTH_TIMEOUT_SECS
        )))
    }

    /// Get the base URL for API calls
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Check if the server process is still running
    pub fn is_running(&self) -> bool {
        if let Ok(mut guard) = self.process.lock() {
            if let Some(ref mut child) = *guard {
                return matches!(child.try_wait(), Ok(None));
            }
        }
        false
    }

    /// Gracefully shutdown the server
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.process.lock() {
            if let Some(mut child) = guard.take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

impl Drop for LlamaServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llama_server_base_url() {
        let server = LlamaServer::new(&ModelConfig::default());
        assert_eq!(server.base_url(), "http://127.0.0.1:8847");
    }

    #[test]
    fn test_llama_server_custom_port() {
        let config = ModelConfig {
            port: 9999,
            ..Default::default()
        };
        let server = LlamaServer::new(&config);
        assert_eq!(server.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_llama_server_args_carry_engine_settings() {
        let config = ModelConfig {
            model_path: PathBuf::from("/models/coder.gguf"),
            context_size: 8192,
            threads: 6,
            gpu_layers: 12,
            chat_format: "chatml".to_string(),
            ..Default::default()
        };
        let args = LlamaServer::new(&config).args();

        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };
        assert_eq!(value_of("--model").as_deref(), Some("/models/coder.gguf"));
        assert_eq!(value_of("--ctx-size").as_deref(), Some("8192"));
        assert_eq!(value_of("--threads").as_deref(), Some("6"));
        assert_eq!(value_of("--n-gpu-layers").as_deref(), Some("12"));
        assert_eq!(value_of("--chat-template").as_deref(), Some("chatml"));
        assert_eq!(value_of("--host").as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_llama_server_not_running_initially() {
        let config = ModelConfig {
            server_binary: PathBuf::from("/nonexistent"),
            ..Default::default()
        };
        let server = LlamaServer::new(&config);
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_start_with_missing_binary_is_engine_error() {
        let config = ModelConfig {
            server_binary: PathBuf::from("/nonexistent/llama-server"),
            ..Default::default()
        };
        let server = LlamaServer::new(&config);
        let err = server.start().await.unwrap_err();
        assert!(matches!(err, JunoError::Engine(_)));
    }
}
