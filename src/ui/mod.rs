// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Presentation layer
//!
//! Everything that talks to the user goes through a [`Console`], passed
//! explicitly to the components that need it. The terminal implementation
//! renders with crossterm and syntect; [`RecordingConsole`] captures output
//! and replays scripted answers for tests.

pub mod display;
pub mod highlight;
pub mod live;
pub mod recording;
pub mod terminal;

pub use recording::{ConsoleEvent, RecordingConsole};
pub use terminal::TerminalConsole;

use crate::error::Result;
use crate::files::CodeLanguage;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Contents of a panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    /// Syntax highlighted source
    Code {
        content: String,
        language: CodeLanguage,
    },
    /// Plain prose
    Text(String),
}

/// Accent colour of a panel's border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStyle {
    #[default]
    Code,
    Response,
    Raw,
}

/// A titled block of output
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub body: PanelBody,
    pub subtitle: Option<String>,
    pub style: PanelStyle,
}

impl Panel {
    pub fn code(title: impl Into<String>, content: impl Into<String>, language: CodeLanguage) -> Self {
        Self {
            title: title.into(),
            body: PanelBody::Code {
                content: content.into(),
                language,
            },
            subtitle: None,
            style: PanelStyle::Code,
        }
    }

    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: PanelBody::Text(text.into()),
            subtitle: None,
            style: PanelStyle::Response,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// The raw text of the body
    pub fn content(&self) -> &str {
        match &self.body {
            PanelBody::Code { content, .. } => content,
            PanelBody::Text(text) => text,
        }
    }
}

/// Output and prompting interface used by the dispatcher and file store
pub trait Console: Send {
    /// Status line with an icon and colour for its level
    fn message(&mut self, level: Level, text: &str);

    /// Unstyled line
    fn line(&mut self, text: &str);

    /// Startup banner
    fn banner(&mut self, model_name: &str);

    /// Two column table
    fn table(&mut self, title: &str, headers: (&str, &str), rows: &[(&str, &str)]);

    /// Static panel
    fn panel(&mut self, panel: &Panel);

    /// Replace the live view with `panel`
    fn live_update(&mut self, panel: &Panel);

    /// Tear down the live view, if any
    fn live_clear(&mut self);

    /// Read one line of input. End of input reads as an empty line.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question; empty input takes `default`
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    fn info(&mut self, text: &str) {
        self.message(Level::Info, text);
    }

    fn success(&mut self, text: &str) {
        self.message(Level::Success, text);
    }

    fn warn(&mut self, text: &str) {
        self.message(Level::Warning, text);
    }

    fn error(&mut self, text: &str) {
        self.message(Level::Error, text);
    }
}
