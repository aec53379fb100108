// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Single-slot file store
//!
//! Tracks at most one loaded file and its in-memory content. Loading
//! resolves `@prefix` arguments by searching the working tree, asks before
//! creating missing files and never touches the session on failure.

pub mod language;
pub mod search;

pub use language::CodeLanguage;

use std::path::{Path, PathBuf};

use crate::error::{JunoError, Result};
use crate::ui::Console;

/// Marker that turns a load argument into a file-name prefix search
pub const PREFIX_MARKER: char = '@';

/// Header written into files created while loading
pub const PLACEHOLDER: &str = "# New file created by Juno\n\n";

/// Default content for [`FileStore::create`]
pub const NEW_FILE_CONTENT: &str = "# New file\n\n";

/// The currently loaded file, if any.
///
/// Content is only ever present together with a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_file: Option<PathBuf>,
    file_content: Option<String>,
}

impl Session {
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn file_content(&self) -> Option<&str> {
        self.file_content.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current_file.is_some()
    }

    /// Language of the loaded file
    pub fn language(&self) -> CodeLanguage {
        self.current_file
            .as_deref()
            .map(CodeLanguage::from_path)
            .unwrap_or_default()
    }

    fn install(&mut self, path: PathBuf, content: String) {
        self.current_file = Some(path);
        self.file_content = Some(content);
    }

    fn take(&mut self) -> Option<PathBuf> {
        self.file_content = None;
        self.current_file.take()
    }
}

/// Result of resolving a `load` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Existing file read from disk
    Loaded { path: PathBuf, content: String },
    /// Missing file created with the placeholder header
    Created { path: PathBuf, content: String },
    /// Prefix search found nothing
    NoMatches,
    /// Empty answer to the selection prompt
    Cancelled,
    /// Selection was not a listed number
    InvalidSelection,
    /// User declined to create a missing file
    Declined,
    /// Path names a directory
    Directory(PathBuf),
    /// Filesystem or decoding failure
    Failed(String),
}

impl LoadOutcome {
    /// Path and content to install, for the successful outcomes
    pub fn into_loaded(self) -> Option<(PathBuf, String)> {
        match self {
            LoadOutcome::Loaded { path, content } | LoadOutcome::Created { path, content } => {
                Some((path, content))
            }
            _ => None,
        }
    }
}

/// File store rooted at the working directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    session: Session,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            session: Session::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute location of a path as given by the user
    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Load a file and install it into the session.
    ///
    /// Returns whether the session now holds the requested file. Errors are
    /// only returned when prompting the user fails.
    pub fn load(&mut self, arg: &str, console: &mut dyn Console) -> Result<bool> {
        match self.resolve(arg, console)?.into_loaded() {
            Some((path, content)) => {
                self.session.install(path, content);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve a load argument to a path and its content without touching
    /// the session
    pub fn resolve(&self, arg: &str, console: &mut dyn Console) -> Result<LoadOutcome> {
        let path = match arg.strip_prefix(PREFIX_MARKER) {
            Some(prefix) => match self.select_by_prefix(prefix, console)? {
                Ok(path) => path,
                Err(outcome) => return Ok(outcome),
            },
            None => PathBuf::from(arg),
        };

        let absolute = self.absolute(&path);
        tracing::debug!("Resolved load argument {:?} to {}", arg, absolute.display());

        if !absolute.exists() {
            return self.offer_create(path, console);
        }

        if absolute.is_dir() {
            console.warn(&format!("'{}' is a directory, not a file.", path.display()));
            console.info("Directory contents:");
            for (name, is_dir) in search::list_directory(&absolute) {
                if is_dir {
                    console.line(&format!("  {}/", name));
                } else {
                    console.line(&format!("  {}", name));
                }
            }
            return Ok(LoadOutcome::Directory(path));
        }

        match read_text(&absolute) {
            Ok(content) => {
                console.success(&format!("File '{}' loaded.", path.display()));
                console.info(&format!(
                    "File size: {} characters",
                    content.chars().count()
                ));
                Ok(LoadOutcome::Loaded { path, content })
            }
            Err(e) => {
                console.error(&format!("Error loading file: {}", e));
                Ok(LoadOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Pick one file among those whose name starts with `prefix`
    fn select_by_prefix(
        &self,
        prefix: &str,
        console: &mut dyn Console,
    ) -> Result<std::result::Result<PathBuf, LoadOutcome>> {
        let mut matches = search::find_files_with_prefix(&self.root, prefix);
        tracing::debug!("{} file(s) match prefix {:?}", matches.len(), prefix);

        if matches.is_empty() {
            console.warn(&format!("No files found starting with '{}'", prefix));
            return Ok(Err(LoadOutcome::NoMatches));
        }

        if matches.len() == 1 {
            let selected = matches.remove(0);
            console.info(&format!("Auto-selected: {}", selected.display()));
            return Ok(Ok(selected));
        }

        console.info("Matching files:");
        for (i, file) in matches.iter().enumerate() {
            console.line(&format!("  {}. {}", i + 1, file.display()));
        }

        let choice = console.read_line("Select file number (or Enter to cancel): ")?;
        let choice = choice.trim();
        if choice.is_empty() {
            return Ok(Err(LoadOutcome::Cancelled));
        }

        match parse_selection(choice, matches.len()) {
            Some(index) => Ok(Ok(matches.swap_remove(index))),
            None => {
                console.error("Invalid selection");
                Ok(Err(LoadOutcome::InvalidSelection))
            }
        }
    }

    fn offer_create(&self, path: PathBuf, console: &mut dyn Console) -> Result<LoadOutcome> {
        console.warn(&format!("File '{}' doesn't exist.", path.display()));

        if !console.confirm(&format!("Create new file '{}'?", path.display()), true)? {
            console.warn("File creation cancelled.");
            return Ok(LoadOutcome::Declined);
        }

        match self.create(&path, PLACEHOLDER, console) {
            Ok(content) => Ok(LoadOutcome::Created { path, content }),
            Err(e) => Ok(LoadOutcome::Failed(e.to_string())),
        }
    }

    /// Write `initial_content` to `path`, creating parent directories.
    ///
    /// Existing files are overwritten. Does not touch the session.
    pub fn create(
        &self,
        path: &Path,
        initial_content: &str,
        console: &mut dyn Console,
    ) -> Result<String> {
        let absolute = self.absolute(path);
        let result = ensure_parent(&absolute, path, console)
            .and_then(|_| std::fs::write(&absolute, initial_content).map_err(JunoError::from));

        match result {
            Ok(()) => {
                console.success(&format!("Created new file: '{}'", path.display()));
                Ok(initial_content.to_string())
            }
            Err(e) => {
                console.error(&format!("Error creating file: {}", e));
                Err(e)
            }
        }
    }

    /// Write `content` to the loaded file.
    ///
    /// Returns false without touching the filesystem when nothing is loaded.
    /// The in-memory content is left as it is.
    pub fn save(&self, content: &str, console: &mut dyn Console) -> bool {
        let Some(path) = self.session.current_file() else {
            console.warn("No file loaded.");
            return false;
        };

        let absolute = self.absolute(path);
        let result = ensure_parent(&absolute, path, console)
            .and_then(|_| std::fs::write(&absolute, content).map_err(JunoError::from));

        match result {
            Ok(()) => {
                tracing::debug!("Wrote {} bytes to {}", content.len(), absolute.display());
                console.success(&format!("Changes saved to '{}'.", path.display()));
                true
            }
            Err(e) => {
                console.error(&format!("Error saving file: {}", e));
                false
            }
        }
    }

    /// Save the in-memory content of the loaded file
    pub fn save_current(&self, console: &mut dyn Console) -> bool {
        match self.session.file_content() {
            Some(content) => self.save(content, console),
            None => {
                console.warn("No file loaded.");
                false
            }
        }
    }

    /// Forget the loaded file
    pub fn clear(&mut self, console: &mut dyn Console) {
        match self.session.take() {
            Some(path) => console.warn(&format!("Cleared file: {}", path.display())),
            None => console.warn("No file loaded."),
        }
    }

    /// Replace the in-memory content of the loaded file
    pub fn update_content(&mut self, content: String) -> Result<()> {
        if !self.session.is_loaded() {
            return Err(JunoError::NoFileLoaded);
        }
        self.session.file_content = Some(content);
        Ok(())
    }
}

/// Parse a 1-based selection among `count` entries into an index
fn parse_selection(choice: &str, count: usize) -> Option<usize> {
    match choice.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

fn ensure_parent(absolute: &Path, shown: &Path, console: &mut dyn Console) -> Result<()> {
    if let Some(parent) = absolute.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            let shown_parent = shown.parent().unwrap_or(parent);
            console.info(&format!("Created directory: {}", shown_parent.display()));
        }
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| JunoError::Decode {
        path: path.to_path_buf(),
    })
}
