// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{JunoError, Result};

use super::Settings;

pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
pub const ENV_CONTEXT_SIZE: &str = "N_CTX";
pub const ENV_THREADS: &str = "N_THREADS";
pub const ENV_GPU_LAYERS: &str = "N_GPU_LAYERS";
pub const ENV_CHAT_FORMAT: &str = "CHAT_FORMAT";
pub const ENV_SERVER_BIN: &str = "LLAMA_SERVER_BIN";
pub const ENV_SERVER_PORT: &str = "LLAMA_SERVER_PORT";
pub const ENV_SERVER_URL: &str = "LLAMA_SERVER_URL";
pub const ENV_MAX_TOKENS: &str = "JUNO_MAX_TOKENS";
pub const ENV_HOME: &str = "JUNO_HOME";

impl Settings {
    /// Load settings from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults; malformed numbers are
    /// configuration errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(path) = get(ENV_MODEL_PATH) {
            settings.model.model_path = PathBuf::from(path);
        }
        if let Some(value) = get(ENV_CONTEXT_SIZE) {
            settings.model.context_size = parse_var(ENV_CONTEXT_SIZE, &value)?;
        }
        if let Some(value) = get(ENV_THREADS) {
            settings.model.threads = parse_var(ENV_THREADS, &value)?;
        }
        if let Some(value) = get(ENV_GPU_LAYERS) {
            settings.model.gpu_layers = parse_var(ENV_GPU_LAYERS, &value)?;
        }
        if let Some(format) = get(ENV_CHAT_FORMAT) {
            settings.model.chat_format = format.trim().to_string();
        }
        if let Some(bin) = get(ENV_SERVER_BIN) {
            settings.model.server_binary = PathBuf::from(bin);
        }
        if let Some(value) = get(ENV_SERVER_PORT) {
            settings.model.port = parse_var(ENV_SERVER_PORT, &value)?;
        }
        if let Some(url) = get(ENV_SERVER_URL) {
            settings.model.base_url = Some(url.trim().trim_end_matches('/').to_string());
        }
        if let Some(value) = get(ENV_MAX_TOKENS) {
            settings.generation.max_tokens = parse_var(ENV_MAX_TOKENS, &value)?;
        }
        if let Some(home) = get(ENV_HOME) {
            settings.ui.home = PathBuf::from(home);
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        JunoError::Config(format!(
            "{} must be a number, got '{}'",
            key,
            value.trim()
        ))
    })
}
