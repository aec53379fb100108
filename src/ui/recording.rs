// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Console that records output and replays scripted answers

use std::collections::VecDeque;

use super::{Console, Level, Panel};
use crate::error::Result;

/// Something shown to, or asked of, the user
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    Message(Level, String),
    Line(String),
    Banner(String),
    Table {
        title: String,
        rows: Vec<(String, String)>,
    },
    Panel(Panel),
    LiveUpdate(Panel),
    LiveClear,
    Prompt(String),
    Confirm { prompt: String, default: bool },
}

impl ConsoleEvent {
    /// Visible text of the event
    pub fn text(&self) -> String {
        match self {
            ConsoleEvent::Message(_, text)
            | ConsoleEvent::Line(text)
            | ConsoleEvent::Banner(text)
            | ConsoleEvent::Prompt(text) => text.clone(),
            ConsoleEvent::Confirm { prompt, .. } => prompt.clone(),
            ConsoleEvent::Table { title, rows } => {
                let mut out = title.clone();
                for (left, right) in rows {
                    out.push('\n');
                    out.push_str(left);
                    out.push('\t');
                    out.push_str(right);
                }
                out
            }
            ConsoleEvent::Panel(panel) | ConsoleEvent::LiveUpdate(panel) => {
                format!("{}\n{}", panel.title, panel.content())
            }
            ConsoleEvent::LiveClear => String::new(),
        }
    }
}

/// In-memory [`Console`] for tests and headless runs.
///
/// Prompts consume scripted answers in order; once they run out
/// `read_line` returns an empty line and `confirm` its default.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    events: Vec<ConsoleEvent>,
    inputs: VecDeque<String>,
    confirmations: VecDeque<bool>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers for `read_line`
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(inputs.into_iter().map(Into::into));
        self
    }

    /// Answers for `confirm`
    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(answers);
        self
    }

    pub fn events(&self) -> &[ConsoleEvent] {
        &self.events
    }

    /// Whether any recorded output contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.text().contains(needle))
    }

    /// Messages recorded at `level`
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ConsoleEvent::Message(l, text) if *l == level => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Static panels in the order they were shown
    pub fn panels(&self) -> Vec<&Panel> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ConsoleEvent::Panel(panel) => Some(panel),
                _ => None,
            })
            .collect()
    }

    /// Number of live view refreshes
    pub fn live_updates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ConsoleEvent::LiveUpdate(_)))
            .count()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Console for RecordingConsole {
    fn message(&mut self, level: Level, text: &str) {
        self.events.push(ConsoleEvent::Message(level, text.to_string()));
    }

    fn line(&mut self, text: &str) {
        self.events.push(ConsoleEvent::Line(text.to_string()));
    }

    fn banner(&mut self, model_name: &str) {
        self.events.push(ConsoleEvent::Banner(model_name.to_string()));
    }

    fn table(&mut self, title: &str, _headers: (&str, &str), rows: &[(&str, &str)]) {
        self.events.push(ConsoleEvent::Table {
            title: title.to_string(),
            rows: rows
                .iter()
                .map(|(l, r)| (l.to_string(), r.to_string()))
                .collect(),
        });
    }

    fn panel(&mut self, panel: &Panel) {
        self.events.push(ConsoleEvent::Panel(panel.clone()));
    }

    fn live_update(&mut self, panel: &Panel) {
        self.events.push(ConsoleEvent::LiveUpdate(panel.clone()));
    }

    fn live_clear(&mut self) {
        self.events.push(ConsoleEvent::LiveClear);
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.events.push(ConsoleEvent::Prompt(prompt.to_string()));
        Ok(self.inputs.pop_front().unwrap_or_default())
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        self.events.push(ConsoleEvent::Confirm {
            prompt: prompt.to_string(),
            default,
        });
        Ok(self.confirmations.pop_front().unwrap_or(default))
    }
}
