// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command parsing for the prompt
//!
//! A line is one of a fixed set of verbs; anything else is a question for
//! the model.

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Clear,
    Show,
    Save,
    /// `load <path>` or `load @<prefix>`
    Load(String),
    /// `edit <instruction>`
    Edit(String),
    /// Free-form question
    Chat(String),
    /// Blank line
    Empty,
    /// Verb given without its required argument
    Usage(&'static str),
}

/// Commands and their descriptions, in help order
pub const COMMAND_HELP: [(&str, &str); 7] = [
    ("load <file_path> or @<prefix>", "Load a file to work with"),
    ("save", "Save changes to the current file"),
    ("show", "Show the current file content"),
    (
        "edit <instruction>",
        "Update the file using AI (file must be loaded)",
    ),
    ("clear", "Clear the current file from memory"),
    ("help", "Show this help message"),
    ("quit", "Exit the program"),
];

pub const LOAD_USAGE: &str = "Usage: load <file_path> or load @<prefix>";
pub const EDIT_USAGE: &str = "Usage: edit <instruction>";

/// Parse one line of input. Verbs are case-insensitive.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Empty;
    }

    let (verb, rest) = match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };
    let verb = verb.to_lowercase();

    match (verb.as_str(), rest.is_empty()) {
        ("quit", true) => Command::Quit,
        ("help", true) => Command::Help,
        ("clear", true) => Command::Clear,
        ("show", true) => Command::Show,
        ("save", true) => Command::Save,
        ("load", true) => Command::Usage(LOAD_USAGE),
        ("load", false) => Command::Load(rest.to_string()),
        ("edit", true) => Command::Usage(EDIT_USAGE),
        ("edit", false) => Command::Edit(rest.to_string()),
        _ => Command::Chat(input.to_string()),
    }
}
