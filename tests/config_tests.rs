// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::collections::HashMap;
use std::path::PathBuf;

use juno::chat::DispatchOptions;
use juno::config::{
    Settings, ENV_CHAT_FORMAT, ENV_CONTEXT_SIZE, ENV_HOME, ENV_MAX_TOKENS, ENV_MODEL_PATH,
    ENV_SERVER_URL, ENV_THREADS,
};
use juno::error::JunoError;

fn settings_from(pairs: &[(&str, &str)]) -> juno::Result<Settings> {
    let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
    Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
}

#[test]
fn test_defaults_without_environment() {
    let settings = settings_from(&[]).unwrap();

    assert_eq!(
        settings.model.model_path,
        PathBuf::from("models/deepseek-coder-6.7b-instruct.Q4_K_M.gguf")
    );
    assert_eq!(settings.model.context_size, 4096);
    assert_eq!(settings.model.threads, 4);
    assert_eq!(settings.model.gpu_layers, 30);
    assert!(settings.model.spawns_server());
    assert!(settings.generation.stream);
}

#[test]
fn test_environment_overrides() {
    let settings = settings_from(&[
        (ENV_MODEL_PATH, "/srv/models/qwen-coder.gguf"),
        (ENV_CONTEXT_SIZE, " 8192 "),
        (ENV_THREADS, "8"),
        (ENV_CHAT_FORMAT, "llama3"),
        (ENV_MAX_TOKENS, "512"),
        (ENV_HOME, "/tmp/juno-home"),
    ])
    .unwrap();

    assert_eq!(settings.model.model_name(), "qwen-coder");
    assert_eq!(settings.model.context_size, 8192);
    assert_eq!(settings.model.threads, 8);
    assert_eq!(settings.model.chat_format, "llama3");
    assert_eq!(settings.generation.max_tokens, 512);
    assert_eq!(
        settings.ui.history_path(),
        PathBuf::from("/tmp/juno-home/history.txt")
    );
}

#[test]
fn test_server_url_trailing_slash_trimmed() {
    let settings = settings_from(&[(ENV_SERVER_URL, "http://127.0.0.1:8080/")]).unwrap();

    assert_eq!(
        settings.model.base_url.as_deref(),
        Some("http://127.0.0.1:8080")
    );
    assert!(!settings.model.spawns_server());
}

#[test]
fn test_blank_values_keep_defaults() {
    let settings = settings_from(&[(ENV_THREADS, "   "), (ENV_CHAT_FORMAT, "")]).unwrap();

    assert_eq!(settings.model.threads, 4);
    assert_eq!(settings.model.chat_format, "chatml");
}

#[test]
fn test_malformed_number_is_config_error() {
    let err = settings_from(&[(ENV_CONTEXT_SIZE, "lots")]).unwrap_err();

    assert!(matches!(err, JunoError::Config(_)));
    assert!(err.to_string().contains("N_CTX"));
    assert!(err.to_string().contains("lots"));
}

#[test]
fn test_zero_values_fail_validation() {
    assert!(settings_from(&[(ENV_MAX_TOKENS, "0")]).is_err());
    assert!(settings_from(&[(ENV_THREADS, "0")]).is_err());
}

#[test]
fn test_dispatch_options_follow_settings() {
    let mut settings = settings_from(&[(ENV_MAX_TOKENS, "300")]).unwrap();
    settings.generation.stream = false;
    settings.ui.refresh_per_second = 10;

    let options = DispatchOptions::from(&settings);
    assert_eq!(options.max_tokens, 300);
    assert!(!options.stream);
    assert_eq!(options.refresh_per_second, 10);
}

#[test]
fn test_settings_serialize_for_show_config() {
    let settings = settings_from(&[]).unwrap();
    let json = serde_json::to_value(&settings).unwrap();

    assert_eq!(json["model"]["chat_format"], "chatml");
    assert!(json["model"].get("base_url").is_none());
    assert_eq!(json["generation"]["max_tokens"], 2048);
}
