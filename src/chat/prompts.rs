// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Request shaping for the two chat modes
//!
//! Every request carries exactly one system message followed by one user
//! message. No history is kept between commands.

use crate::files::CodeLanguage;
use crate::llm::{CompletionRequest, Message};

/// Literal strings that end generation early
pub const STOP_SEQUENCES: [&str; 4] = ["<|im_end|>", "###", "Instruction:", "User:"];

/// Default response budget in tokens
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Provide clear, concise, \
and helpful responses to the user's questions and requests.";

/// Which kind of conversation a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    General,
    CodeEdit,
}

impl ChatMode {
    /// Sampling temperature: near-deterministic for edits
    pub fn temperature(&self) -> f32 {
        match self {
            ChatMode::General => 0.7,
            ChatMode::CodeEdit => 0.1,
        }
    }
}

/// System prompt for editing code in `language`
pub fn edit_system_prompt(language: CodeLanguage) -> String {
    let name = language.display_name();
    format!(
        "You are an expert {name} programmer. Modify the given code according to the user's \
         instruction. Return ONLY the complete updated {name} code with no explanations, no \
         markdown, and no additional text. Just the pure executable {name} code."
    )
}

/// User message carrying the current code and the instruction
pub fn edit_user_message(instruction: &str, code: &str, language: CodeLanguage) -> String {
    format!(
        "Current code:\n```{tag}\n{code}\n```\n\nInstruction: {instruction}\n\n\
         Return ONLY the complete updated {name} code:",
        tag = language.fence_tag(),
        name = language.display_name(),
    )
}

fn request(mode: ChatMode, system: String, user: String, max_tokens: u32) -> CompletionRequest {
    CompletionRequest::new(vec![Message::system(system), Message::user(user)])
        .with_max_tokens(max_tokens)
        .with_temperature(mode.temperature())
        .with_stop(STOP_SEQUENCES)
}

/// Request for a free-form question
pub fn general_request(prompt: &str, max_tokens: u32) -> CompletionRequest {
    request(
        ChatMode::General,
        GENERAL_SYSTEM_PROMPT.to_string(),
        prompt.to_string(),
        max_tokens,
    )
}

/// Request to rewrite `code` according to `instruction`
pub fn edit_request(
    instruction: &str,
    code: &str,
    language: CodeLanguage,
    max_tokens: u32,
) -> CompletionRequest {
    request(
        ChatMode::CodeEdit,
        edit_system_prompt(language),
        edit_user_message(instruction, code, language),
        max_tokens,
    )
}
