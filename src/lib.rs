// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Juno - terminal assistant for chatting with a local model and editing
//! one file at a time.
//!
//! Architecture highlights:
//! - `chat`: command parsing, dispatch, request shaping and code extraction
//! - `files`: the single-slot file store and working-tree search
//! - `llm`: provider abstraction and the llama-server backend
//! - `ui`: console abstraction, terminal rendering and live view
//! - `repl`: the read-eval loop, line editing and completion

pub mod cancel;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod llm;
pub mod repl;
pub mod ui;

pub use error::{JunoError, Result};
