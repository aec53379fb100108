// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! rustyline helper: path completion for `load`

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{PathBuf, MAIN_SEPARATOR};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::files::search::{path_completions, prefix_completions};
use crate::files::PREFIX_MARKER;

const LOAD: &str = "load ";

/// What the cursor is completing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionTarget<'a> {
    /// `load @<prefix>`: file names anywhere in the tree. Candidates
    /// replace the marker too, leaving a plain relative path.
    Prefix { start: usize, prefix: &'a str },
    /// `load <partial>`: entries of a directory
    Path { start: usize, partial: &'a str },
    None,
}

/// Work out what the text before the cursor asks to complete
pub fn completion_target(line: &str) -> CompletionTarget<'_> {
    let is_load = line
        .get(..LOAD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(LOAD));
    if !is_load {
        return CompletionTarget::None;
    }

    let arg = &line[LOAD.len()..];
    match arg.strip_prefix(PREFIX_MARKER) {
        Some(prefix) => CompletionTarget::Prefix {
            start: LOAD.len(),
            prefix,
        },
        None => CompletionTarget::Path {
            start: LOAD.len(),
            partial: arg,
        },
    }
}

/// Line editor helper for the Juno prompt
#[derive(Debug, Clone)]
pub struct JunoHelper {
    root: PathBuf,
}

impl JunoHelper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Candidates and the byte offset they replace from
    pub fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        match completion_target(line) {
            CompletionTarget::Prefix { start, prefix } => {
                (start, prefix_completions(&self.root, prefix))
            }
            CompletionTarget::Path { start, partial } => {
                (start, path_completions(&self.root, partial))
            }
            CompletionTarget::None => (0, Vec::new()),
        }
    }
}

impl Helper for JunoHelper {}

impl Completer for JunoHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(line) = line.get(..pos) else {
            return Ok((pos, Vec::new()));
        };
        let (start, items) = self.candidates(line);
        let pairs = items
            .into_iter()
            .map(|item| Pair {
                display: item.clone(),
                replacement: item,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for JunoHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if hint.is_empty() {
            Borrowed(hint)
        } else {
            Owned(format!("\x1b[90m{}\x1b[0m", hint))
        }
    }
}

impl Hinter for JunoHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        // Suggest the rest of a unique top-level file match inline; the
        // result still resolves as an `@` prefix
        match completion_target(line) {
            CompletionTarget::Prefix { prefix, .. } if !prefix.is_empty() => {
                let items = prefix_completions(&self.root, prefix);
                match items.as_slice() {
                    [only] if !only.ends_with(MAIN_SEPARATOR) => {
                        only.strip_prefix(prefix).map(str::to_string)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Validator for JunoHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_completion_target() {
        assert_eq!(
            completion_target("load @fo"),
            CompletionTarget::Prefix {
                start: 5,
                prefix: "fo"
            }
        );
        assert_eq!(
            completion_target("LOAD src/"),
            CompletionTarget::Path {
                start: 5,
                partial: "src/"
            }
        );
        assert_eq!(completion_target("edit something"), CompletionTarget::None);
        assert_eq!(completion_target("lo"), CompletionTarget::None);
    }

    #[test]
    fn test_candidates_for_prefix() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/foo_bar.txt"), "").unwrap();
        let helper = JunoHelper::new(dir.path());

        let (start, items) = helper.candidates("load @foo");
        assert_eq!(start, 5);
        assert_eq!(items, vec![format!("notes{}foo_bar.txt", MAIN_SEPARATOR)]);
    }

    #[test]
    fn test_accepted_prefix_candidate_drops_marker() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/foo_bar.txt"), "").unwrap();
        let helper = JunoHelper::new(dir.path());

        let line = "load @foo";
        let (start, items) = helper.candidates(line);
        let accepted = format!("{}{}", &line[..start], items[0]);
        assert_eq!(accepted, format!("load notes{}foo_bar.txt", MAIN_SEPARATOR));
    }

    #[test]
    fn test_candidates_for_empty_path_list_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        let helper = JunoHelper::new(dir.path());

        let (start, items) = helper.candidates("load ");
        assert_eq!(start, 5);
        assert_eq!(items, vec!["a.py".to_string()]);
    }
}
