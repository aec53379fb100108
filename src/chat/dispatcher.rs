// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command dispatch
//!
//! Routes a parsed line to the file store or the model. Model output is
//! shown live while it streams; only the final text reaches the decision
//! to change the loaded file.

use std::sync::Arc;
use std::time::Instant;

use crate::cancel::CancelSignal;
use crate::config::Settings;
use crate::error::{JunoError, Result};
use crate::files::{FileStore, Session};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::ui::live::RefreshLimiter;
use crate::ui::{Console, Panel, PanelStyle};

use super::commands::{parse_command, Command, COMMAND_HELP};
use super::extract::{extract_code, Extraction};
use super::prompts;
use super::streaming::{collect_complete, collect_stream, StreamedResponse};

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Knobs for model calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Stream into a live view instead of one batched call
    pub stream: bool,
    pub max_tokens: u32,
    /// Live view refresh rate
    pub refresh_per_second: u32,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            stream: true,
            max_tokens: prompts::DEFAULT_MAX_TOKENS,
            refresh_per_second: 4,
        }
    }
}

impl From<&Settings> for DispatchOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            stream: settings.generation.stream,
            max_tokens: settings.generation.max_tokens,
            refresh_per_second: settings.ui.refresh_per_second,
        }
    }
}

/// Executes commands against the file store and the model
pub struct Dispatcher {
    store: FileStore,
    provider: Arc<dyn LlmProvider>,
    options: DispatchOptions,
    cancel: CancelSignal,
}

impl Dispatcher {
    pub fn new(
        store: FileStore,
        provider: Arc<dyn LlmProvider>,
        options: DispatchOptions,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            store,
            provider,
            options,
            cancel,
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Render the command table
    pub fn show_help(&self, console: &mut dyn Console) {
        console.table("Available Commands", ("Command", "Description"), &COMMAND_HELP);
    }

    /// Handle one line of input.
    ///
    /// Recoverable failures are reported on `console`; errors are returned
    /// only for interruption and broken prompts.
    pub async fn dispatch(&mut self, line: &str, console: &mut dyn Console) -> Result<Flow> {
        let command = parse_command(line);
        tracing::debug!("Dispatching {:?}", command);

        match command {
            Command::Quit => {
                console.line("Goodbye!");
                return Ok(Flow::Quit);
            }
            Command::Help => self.show_help(console),
            Command::Clear => self.store.clear(console),
            Command::Load(arg) => {
                self.store.load(&arg, console)?;
            }
            Command::Show => self.show(console),
            Command::Save => {
                self.store.save_current(console);
            }
            Command::Edit(instruction) => self.edit(&instruction, console).await?,
            Command::Chat(prompt) => self.chat(&prompt, console).await?,
            Command::Usage(usage) => console.warn(usage),
            Command::Empty => {}
        }

        Ok(Flow::Continue)
    }

    fn show(&self, console: &mut dyn Console) {
        let session = self.store.session();
        match (session.current_file(), session.file_content()) {
            (Some(path), Some(content)) => {
                console.panel(&Panel::code(
                    format!("Current File: {}", path.display()),
                    content,
                    session.language(),
                ));
            }
            _ => console.warn("No file loaded."),
        }
    }

    fn subtitle(&self) -> String {
        match self.store.session().current_file() {
            Some(path) => format!("File: {}", path.display()),
            None => "Type 'help' for commands".to_string(),
        }
    }

    async fn edit(&mut self, instruction: &str, console: &mut dyn Console) -> Result<()> {
        let Some(code) = self.store.session().file_content().map(str::to_string) else {
            console.warn("No file loaded. Use 'load <file>' first or just type your question.");
            return Ok(());
        };
        let language = self.store.session().language();

        console.info("Thinking about code changes...");
        let request = prompts::edit_request(instruction, &code, language, self.options.max_tokens);

        let response = match self
            .run_model(request, console, |text| {
                Panel::code("AI is writing code...", extract_code(text), language)
                    .with_style(PanelStyle::Raw)
            })
            .await
        {
            Ok(response) => response,
            Err(e) => return report_failure(e, console),
        };

        let extraction = Extraction::from_response(&response.text);
        tracing::debug!(
            "Extracted {} chars ({:?}) from {} char response",
            extraction.code.len(),
            extraction.kind,
            response.text.len()
        );

        if extraction.code.is_empty() {
            console.error("Could not extract valid code from response");
            console.panel(&Panel::text("AI response", &response.text).with_style(PanelStyle::Raw));
            return Ok(());
        }

        if extraction.is_fallback() {
            console.warn("The response does not look like code.");
            console.panel(&Panel::text("AI response", &response.text).with_style(PanelStyle::Raw));
            if !console.confirm("Use this response as the new file content?", false)? {
                console.warn("Edit discarded. The file content is unchanged.");
                return Ok(());
            }
        }

        self.store.update_content(extraction.code)?;

        let content = self.store.session().file_content().unwrap_or_default();
        console.panel(&Panel::code("Updated Code", content, language));
        console.success(&format!(
            "Code length: {} characters",
            content.chars().count()
        ));
        console.info("Use 'save' to write the changes to disk.");
        Ok(())
    }

    async fn chat(&mut self, prompt: &str, console: &mut dyn Console) -> Result<()> {
        if self.store.session().is_loaded() {
            console.warn(
                "Tip: You have a file loaded. Use 'edit' for code changes or 'clear' to remove the file.",
            );
        }

        console.info("Thinking...");
        let request = prompts::general_request(prompt, self.options.max_tokens);
        let subtitle = self.subtitle();

        let response = match self
            .run_model(request, console, |text| {
                Panel::text("AI is thinking...", text).with_subtitle(subtitle.as_str())
            })
            .await
        {
            Ok(response) => response,
            Err(e) => return report_failure(e, console),
        };

        console.panel(&Panel::text("AI Response", response.text.trim()).with_subtitle(subtitle));
        Ok(())
    }

    /// Call the model, refreshing the live view with `live_panel` while
    /// tokens arrive
    async fn run_model<P>(
        &self,
        request: CompletionRequest,
        console: &mut dyn Console,
        live_panel: P,
    ) -> Result<StreamedResponse>
    where
        P: Fn(&str) -> Panel,
    {
        let provider = self.provider.as_ref();

        if !self.options.stream {
            return collect_complete(provider, request, &self.cancel).await;
        }

        let mut limiter = RefreshLimiter::new(self.options.refresh_per_second);
        console.live_update(&live_panel(""));
        limiter.ready(Instant::now());

        let result = collect_stream(provider, request, &self.cancel, |text| {
            if limiter.ready(Instant::now()) {
                console.live_update(&live_panel(text));
            }
        })
        .await;

        console.live_clear();
        result
    }
}

/// Report a failed model call. Interruption is passed on to the loop.
fn report_failure(error: JunoError, console: &mut dyn Console) -> Result<()> {
    match error {
        JunoError::Cancelled => Err(JunoError::Cancelled),
        e => {
            tracing::warn!("Model call failed: {}", e);
            console.error(&format!("Error during streaming: {}", e));
            Ok(())
        }
    }
}
