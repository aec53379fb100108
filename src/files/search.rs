// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Filesystem lookups behind `load @prefix` and tab completion

use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use walkdir::WalkDir;

/// Recursively find files whose name starts with `prefix`.
///
/// Returned paths are relative to `root`, in walk order with entries of
/// each directory sorted by name.
pub fn find_files_with_prefix(root: &Path, prefix: &str) -> Vec<PathBuf> {
    walk(root)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .filter_map(|entry| relative(root, entry.path()))
        .collect()
}

/// Completion candidates for `load @<prefix>`.
///
/// Files and directories anywhere under `root` whose name starts with
/// `prefix`, relative to `root`, directories suffixed with a separator,
/// sorted alphabetically.
pub fn prefix_completions(root: &Path, prefix: &str) -> Vec<String> {
    let mut items: Vec<String> = walk(root)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .filter_map(|entry| {
            let rel = relative(root, entry.path())?;
            let mut item = rel.to_string_lossy().to_string();
            if entry.file_type().is_dir() {
                item.push(MAIN_SEPARATOR);
            }
            Some(item)
        })
        .collect();
    items.sort();
    items
}

/// Completion candidates for `load <partial>` without the `@` marker.
///
/// An empty partial lists `root`; a partial naming a directory lists that
/// directory. Anything else yields nothing.
pub fn path_completions(root: &Path, partial: &str) -> Vec<String> {
    if partial.is_empty() {
        return list_directory(root)
            .into_iter()
            .map(|(name, is_dir)| decorate(name, is_dir))
            .collect();
    }

    let dir = root.join(partial);
    if !dir.is_dir() {
        return Vec::new();
    }

    list_directory(&dir)
        .into_iter()
        .map(|(name, is_dir)| {
            let full = Path::new(partial).join(name);
            decorate(full.to_string_lossy().to_string(), is_dir)
        })
        .collect()
}

/// Entries of a single directory as `(name, is_dir)`, sorted by name
pub fn list_directory(dir: &Path) -> Vec<(String, bool)> {
    let mut entries: Vec<(String, bool)> = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|e| e.ok())
            .map(|e| {
                let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
                (e.file_name().to_string_lossy().to_string(), is_dir)
            })
            .collect(),
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    entries.sort();
    entries
}

fn walk(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
}

fn relative(root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

fn decorate(mut item: String, is_dir: bool) -> String {
    if is_dir {
        item.push(MAIN_SEPARATOR);
    }
    item
}
