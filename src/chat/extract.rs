// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Code extraction from free-text model output
//!
//! Best-effort and lossy by nature:
//! 1. the first fenced block wins, trimmed;
//! 2. otherwise lines that look like code are kept, starting at the first
//!    one, together with blank lines after it;
//! 3. otherwise the trimmed text is returned as is.
//!
//! Works on partial text too, so the live view can show code as it streams.

use regex::Regex;
use std::sync::OnceLock;

const FENCE: &str = "```";

/// Line prefixes that mark code, checked after leading whitespace
const CODE_PREFIXES: [&str; 5] = ["#", "def ", "import ", "from ", "class "];

/// Substrings that mark code anywhere in a line
const CODE_MARKERS: [&str; 6] = ["=", ":", "(", ")", "return ", "print("];

const FENCE_PATTERN: &str = r"(?s)```(?:(?:[A-Za-z][A-Za-z0-9_+#.\-]*)?[ \t]*\r?\n)?(.*?)```";

static FENCE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// First fenced region; an optional language tag on the opening fence is
/// skipped. A tag starts with a letter, so `#` opens a comment instead.
fn fence_regex() -> Option<&'static Regex> {
    FENCE_RE
        .get_or_init(|| match Regex::new(FENCE_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Fence pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

/// How the code was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    /// Content of the first fenced block
    Fenced,
    /// Lines classified as code
    Heuristic,
    /// Nothing looked like code; the whole trimmed response
    Fallback,
}

/// Extracted code and how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub code: String,
    pub kind: ExtractionKind,
}

impl Extraction {
    /// Run the extraction steps on `text`
    pub fn from_response(text: &str) -> Self {
        if let Some(code) = fenced_block(text) {
            return Self {
                code,
                kind: ExtractionKind::Fenced,
            };
        }

        if let Some(code) = code_lines(text) {
            return Self {
                code,
                kind: ExtractionKind::Heuristic,
            };
        }

        Self {
            code: text.trim().to_string(),
            kind: ExtractionKind::Fallback,
        }
    }

    /// Whether the result is the raw response rather than recognised code
    pub fn is_fallback(&self) -> bool {
        self.kind == ExtractionKind::Fallback
    }
}

/// Best-effort code payload of a model response. Never fails.
pub fn extract_code(text: &str) -> String {
    Extraction::from_response(text).code
}

/// Whether a single line looks like code
pub fn is_code_line(line: &str) -> bool {
    let stripped = line.trim();
    CODE_PREFIXES.iter().any(|p| stripped.starts_with(p))
        || CODE_MARKERS.iter().any(|m| line.contains(m))
}

fn fenced_block(text: &str) -> Option<String> {
    if !text.contains(FENCE) {
        return None;
    }
    fence_regex()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn code_lines(text: &str) -> Option<String> {
    let mut kept: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if is_code_line(line) {
            kept.push(line);
        } else if !kept.is_empty() && line.trim().is_empty() {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("\n").trim().to_string())
    }
}
