// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::Path;
use std::sync::Arc;

use juno::config::Settings;
use juno::error::{JunoError, Result};
use juno::llm::providers::LocalProvider;
use juno::ui::Console;

const MODEL_URL: &str = "https://huggingface.co/TheBloke/deepseek-coder-6.7B-instruct-GGUF/resolve/main/deepseek-coder-6.7b-instruct.Q4_K_M.gguf";

/// Explain how to get a model file in place
pub(super) fn print_model_guidance(console: &mut dyn Console, model_path: &Path) {
    let dir = model_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("models"));

    console.warn("Please download a GGUF model and place it at the configured MODEL_PATH");
    console.info("Example commands to download a model:");
    console.line(&format!("  mkdir -p {}", dir.display()));
    console.line(&format!("  wget -P {}/ {}", dir.display(), MODEL_URL));
    console.success("Or use a different model from: https://huggingface.co/TheBloke");
}

/// Check the model artifact and bring up the local engine.
///
/// Any failure is reported with remediation guidance before it is returned.
pub(super) async fn start_engine(
    settings: &Settings,
    console: &mut dyn Console,
) -> Result<Arc<LocalProvider>> {
    let model = &settings.model;

    if model.spawns_server() && !model.model_path.exists() {
        console.error(&format!(
            "Model file not found: {}",
            model.model_path.display()
        ));
        print_model_guidance(console, &model.model_path);
        return Err(JunoError::Engine(format!(
            "Model file not found: {}",
            model.model_path.display()
        )));
    }

    let provider = LocalProvider::new(model.clone());

    match &model.base_url {
        Some(url) => console.info(&format!("Using model server at {}", url)),
        None => console.info(&format!("Loading model {}...", model.model_name())),
    }

    if let Err(e) = provider.start().await {
        console.error(&format!("Error loading model: {}", e));
        if model.spawns_server() {
            console.warn(&format!(
                "Make sure '{}' is installed and on your PATH (set LLAMA_SERVER_BIN otherwise).",
                model.server_binary.display()
            ));
            print_model_guidance(console, &model.model_path);
        }
        return Err(e);
    }

    tracing::info!("Model engine ready ({})", model.model_name());
    Ok(Arc::new(provider))
}
