// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The read-eval loop
//!
//! Reads one line at a time, hands it to the dispatcher and waits for the
//! command to finish before reading the next. Interruption is checked
//! between lines.

pub mod helper;

use std::collections::VecDeque;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::cancel::CancelSignal;
use crate::chat::{Dispatcher, Flow};
use crate::error::{JunoError, Result};
use crate::ui::Console;

pub use helper::JunoHelper;

/// Prompt shown for each command
pub const PROMPT: &str = "You: ";

/// Result of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C at the prompt
    Interrupted,
    /// Ctrl-D or closed input
    Eof,
}

/// Source of input lines
pub trait LineReader {
    fn read(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Remember a submitted line
    fn add_history(&mut self, _line: &str) {}

    /// Persist remembered lines
    fn save_history(&mut self) {}
}

/// rustyline-backed reader with completion and persistent history
pub struct EditorReader {
    editor: Editor<JunoHelper, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl EditorReader {
    pub fn new(helper: JunoHelper, history_path: Option<PathBuf>) -> Result<Self> {
        let mut editor = Editor::<JunoHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(helper));

        if let Some(ref path) = history_path {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!("No history loaded from {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineReader for EditorReader {
    fn read(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!("Failed to add history entry: {}", e);
        }
    }

    fn save_history(&mut self) {
        let Some(ref path) = self.history_path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Cannot create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = self.editor.save_history(path) {
            tracing::warn!("Failed to save history to {}: {}", path.display(), e);
        }
    }
}

/// Reader that replays fixed lines, then reports end of input
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            history: Vec::new(),
        }
    }

    /// Lines that reached the history
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Lines not read yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedReader {
    fn read(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        Ok(match self.lines.pop_front() {
            Some(line) => ReadOutcome::Line(line),
            None => ReadOutcome::Eof,
        })
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

/// Run commands until `quit`, interruption or end of input.
///
/// Failures inside a command are reported and the loop goes on.
pub async fn run_loop(
    dispatcher: &mut Dispatcher,
    reader: &mut dyn LineReader,
    console: &mut dyn Console,
    cancel: &CancelSignal,
) -> Result<()> {
    loop {
        if cancel.is_cancelled() {
            console.line("Exiting...");
            break;
        }

        let line = match reader.read(PROMPT) {
            Ok(ReadOutcome::Line(line)) => line,
            Ok(ReadOutcome::Interrupted) | Ok(ReadOutcome::Eof) => {
                console.line("Exiting...");
                break;
            }
            Err(e) => {
                console.error(&format!("Error: {}", e));
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        reader.add_history(line);

        match dispatcher.dispatch(line, console).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(JunoError::Cancelled) => {
                tracing::debug!("Command interrupted");
            }
            Err(e) => console.error(&format!("Error: {}", e)),
        }
    }

    reader.save_history();
    Ok(())
}
