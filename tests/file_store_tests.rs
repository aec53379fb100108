// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::fs;
use std::path::Path;

use juno::chat::{parse_command, Command};
use juno::files::search::{find_files_with_prefix, list_directory};
use juno::files::{CodeLanguage, FileStore, LoadOutcome, PLACEHOLDER};
use juno::repl::JunoHelper;
use juno::ui::{Level, RecordingConsole};
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("notes")).unwrap();
    fs::create_dir_all(dir.path().join("src/app")).unwrap();
    fs::write(dir.path().join("notes/foo_bar.txt"), "remember the milk\n").unwrap();
    fs::write(dir.path().join("src/app/main.rs"), "fn main() {}\n").unwrap();
    fs::write(dir.path().join("src/app/mod_a.py"), "a = 1\n").unwrap();
    fs::write(dir.path().join("src/mod_b.py"), "b = 2\n").unwrap();
    dir
}

#[test]
fn test_prefix_load_auto_selects_single_nested_match() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new();

    assert!(store.load("@foo", &mut console).unwrap());

    let expected = Path::new("notes").join("foo_bar.txt");
    assert_eq!(store.session().current_file(), Some(expected.as_path()));
    assert_eq!(store.session().file_content(), Some("remember the milk\n"));
    assert!(console.contains("Auto-selected"));
}

#[test]
fn test_prefix_matches_are_relative_and_in_walk_order() {
    let dir = project();
    let matches = find_files_with_prefix(dir.path(), "mod_");

    assert_eq!(
        matches,
        vec![
            Path::new("src").join("app").join("mod_a.py"),
            Path::new("src").join("mod_b.py"),
        ]
    );
}

#[test]
fn test_prefix_selection_by_number() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new().with_inputs(["2"]);

    assert!(store.load("@mod_", &mut console).unwrap());
    assert_eq!(
        store.session().current_file(),
        Some(Path::new("src").join("mod_b.py").as_path())
    );
    assert_eq!(store.session().file_content(), Some("b = 2\n"));
}

#[test]
fn test_out_of_range_selection_leaves_session_alone() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new().with_inputs(["0", "7"]);

    assert!(!store.load("@mod_", &mut console).unwrap());
    assert!(!store.load("@mod_", &mut console).unwrap());
    assert!(!store.session().is_loaded());
    assert_eq!(console.messages(Level::Error), vec!["Invalid selection"; 2]);
}

#[test]
fn test_no_prefix_matches() {
    let dir = project();
    let store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new();

    assert_eq!(
        store.resolve("@zzz", &mut console).unwrap(),
        LoadOutcome::NoMatches
    );
    assert!(console.contains("No files found starting with 'zzz'"));
}

#[test]
fn test_declined_creation_writes_nothing() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new().with_confirmations([false]);

    assert!(!store.load("fresh/tool.py", &mut console).unwrap());
    assert!(!store.session().is_loaded());
    assert!(!dir.path().join("fresh").exists());
}

#[test]
fn test_created_file_round_trips_through_save() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new().with_confirmations([true]);

    assert!(store.load("scripts/tool.py", &mut console).unwrap());
    assert_eq!(store.session().file_content(), Some(PLACEHOLDER));
    assert_eq!(store.session().language(), CodeLanguage::Python);

    store.update_content("print('done')\n".to_string()).unwrap();
    assert!(store.save_current(&mut console));

    let on_disk = fs::read_to_string(dir.path().join("scripts/tool.py")).unwrap();
    assert_eq!(on_disk, "print('done')\n");
    assert_eq!(store.session().file_content(), Some("print('done')\n"));
}

#[test]
fn test_save_after_clear_writes_nothing() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new();

    store.load("src/mod_b.py", &mut console).unwrap();
    store.update_content("changed".to_string()).unwrap();
    store.clear(&mut console);

    assert!(!store.save_current(&mut console));
    assert_eq!(
        fs::read_to_string(dir.path().join("src/mod_b.py")).unwrap(),
        "b = 2\n"
    );
    assert!(console.contains("Cleared file"));
}

#[test]
fn test_language_follows_extension() {
    let dir = project();
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new();

    store.load("src/app/main.rs", &mut console).unwrap();
    assert_eq!(store.session().language(), CodeLanguage::Rust);
}

#[test]
fn test_list_directory_marks_subdirectories() {
    let dir = project();
    let entries = list_directory(&dir.path().join("src"));

    assert!(entries.contains(&("app".to_string(), true)));
    assert!(entries.contains(&("mod_b.py".to_string(), false)));
}

#[test]
fn test_completed_prefix_line_loads_nested_file() {
    let dir = project();
    let helper = JunoHelper::new(dir.path());
    let mut store = FileStore::new(dir.path());
    let mut console = RecordingConsole::new();

    let typed = "load @foo";
    let (start, items) = helper.candidates(typed);
    assert_eq!(items.len(), 1);
    let completed = format!("{}{}", &typed[..start], items[0]);

    let Command::Load(arg) = parse_command(&completed) else {
        panic!("Expected a load command, got {:?}", parse_command(&completed));
    };
    assert!(store.load(&arg, &mut console).unwrap());
    assert_eq!(
        store.session().current_file(),
        Some(Path::new("notes").join("foo_bar.txt").as_path())
    );
    assert!(!console.contains("No files found"));
}

#[test]
fn test_completed_directory_candidate_lists_its_entries() {
    let dir = project();
    let helper = JunoHelper::new(dir.path());

    let (start, items) = helper.candidates("load @sr");
    let completed = format!("{}{}", &"load @sr"[..start], items[0]);
    let (_, inside) = helper.candidates(&completed);

    assert!(inside.iter().any(|item| item.ends_with("mod_b.py")));
}
