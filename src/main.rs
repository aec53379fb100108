// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Juno - chat with a local model and edit files from your terminal
//!
//! Entry point for the Juno CLI application.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use juno::cancel::CancelSignal;
use juno::chat::{DispatchOptions, Dispatcher};
use juno::cli::Cli;
use juno::config::Settings;
use juno::error::Result;
use juno::files::FileStore;
use juno::llm::LlmProvider;
use juno::repl::{self, EditorReader, JunoHelper};
use juno::ui::{Console, TerminalConsole};

#[path = "main/startup.rs"]
mod startup;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG takes precedence over -v
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)?;
    }

    // Load settings
    let mut settings = Settings::from_env()?;
    cli.apply_overrides(&mut settings);
    settings.validate()?;

    if cli.show_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let root = std::env::current_dir()?;
    let mut console = TerminalConsole::new();

    let provider = startup::start_engine(&settings, &mut console).await?;

    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received");
                cancel.cancel();
            }
        });
    }

    console.banner(provider.model_name());

    let mut dispatcher = Dispatcher::new(
        FileStore::new(&root),
        provider,
        DispatchOptions::from(&settings),
        cancel.clone(),
    );
    dispatcher.show_help(&mut console);

    let mut reader = EditorReader::new(
        JunoHelper::new(&root),
        Some(settings.ui.history_path()),
    )?;

    repl::run_loop(&mut dispatcher, &mut reader, &mut console, &cancel).await
}
