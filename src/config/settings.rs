// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Juno
//!
//! Settings are resolved from environment variables (optionally seeded from a
//! `.env` file in the working directory) and then overridden by CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod env;
mod validation;

pub use env::{
    ENV_CHAT_FORMAT, ENV_CONTEXT_SIZE, ENV_GPU_LAYERS, ENV_HOME, ENV_MAX_TOKENS, ENV_MODEL_PATH,
    ENV_SERVER_BIN, ENV_SERVER_PORT, ENV_SERVER_URL, ENV_THREADS,
};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Local inference engine configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Generation parameters shared by both chat modes
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Terminal behaviour
    #[serde(default)]
    pub ui: UiConfig,
}

/// Local LLM configuration (llama-server subprocess)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the GGUF model file
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Context window in tokens
    #[serde(default = "default_context_size")]
    pub context_size: u32,

    /// CPU threads used for inference
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Layers to offload to the GPU
    #[serde(default = "default_gpu_layers")]
    pub gpu_layers: i32,

    /// Chat prompt template name passed to llama-server (e.g. "chatml")
    #[serde(default = "default_chat_format")]
    pub chat_format: String,

    /// llama-server executable
    #[serde(default = "default_server_binary")]
    pub server_binary: PathBuf,

    /// Port for llama-server (default: 8847)
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Optional base URL for an existing OpenAI-compatible local server.
    /// When set, Juno will use this endpoint instead of launching llama-server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Stream tokens into a live view instead of waiting for the full reply
    #[serde(default = "default_true")]
    pub stream: bool,
}

/// Terminal behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Live view refreshes per second while streaming
    #[serde(default = "default_refresh_per_second")]
    pub refresh_per_second: u32,

    /// Directory holding the input history file
    #[serde(default = "default_home")]
    pub home: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            context_size: default_context_size(),
            threads: default_threads(),
            gpu_layers: default_gpu_layers(),
            chat_format: default_chat_format(),
            server_binary: default_server_binary(),
            port: default_server_port(),
            base_url: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            stream: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_per_second: default_refresh_per_second(),
            home: default_home(),
        }
    }
}

impl UiConfig {
    /// Path of the line-editor history file
    pub fn history_path(&self) -> PathBuf {
        self.home.join("history.txt")
    }
}

impl ModelConfig {
    /// Model name shown to the user, derived from the file stem
    pub fn model_name(&self) -> String {
        self.model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("local")
            .to_string()
    }

    /// Whether Juno has to launch llama-server itself
    pub fn spawns_server(&self) -> bool {
        self.base_url.is_none()
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/deepseek-coder-6.7b-instruct.Q4_K_M.gguf")
}

fn default_context_size() -> u32 {
    4096
}

fn default_threads() -> u32 {
    4
}

fn default_gpu_layers() -> i32 {
    30
}

fn default_chat_format() -> String {
    "chatml".to_string()
}

fn default_server_binary() -> PathBuf {
    PathBuf::from("llama-server")
}

fn default_server_port() -> u16 {
    8847
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_refresh_per_second() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".juno")
}
