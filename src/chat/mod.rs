// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat and code-edit orchestration
//!
//! This module turns input lines into commands, shapes model requests,
//! streams responses and pulls code out of them.

pub mod commands;
pub mod dispatcher;
pub mod extract;
pub mod prompts;
pub mod streaming;

pub use commands::{parse_command, Command};
pub use dispatcher::{DispatchOptions, Dispatcher, Flow};
pub use extract::{extract_code, is_code_line, Extraction, ExtractionKind};
pub use prompts::ChatMode;
