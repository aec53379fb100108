// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Terminal syntax highlighting with syntect

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

use crate::files::CodeLanguage;

const THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn theme() -> Option<&'static Theme> {
    theme_set()
        .themes
        .get(THEME)
        .or_else(|| theme_set().themes.values().next())
}

/// Highlight `code`, one escaped string per source line.
///
/// Lines that fail to highlight are returned as plain text.
pub fn highlight_lines(code: &str, language: CodeLanguage) -> Vec<String> {
    let Some(theme) = theme() else {
        return code.lines().map(str::to_string).collect();
    };

    let ps = syntax_set();
    let syntax = ps
        .find_syntax_by_extension(language.syntax_extension())
        .or_else(|| ps.find_syntax_by_token(language.fence_tag()))
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    LinesWithEndings::from(code)
        .map(|line| {
            let plain = line.trim_end_matches(['\n', '\r']);
            match highlighter.highlight_line(line, ps) {
                Ok(ranges) => {
                    let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
                    format!("{}{}", escaped.trim_end_matches(['\n', '\r']), RESET)
                }
                Err(e) => {
                    tracing::trace!("Highlighting failed: {}", e);
                    plain.to_string()
                }
            }
        })
        .collect()
}
