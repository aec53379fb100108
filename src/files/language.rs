// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Language of the loaded file, inferred from its extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Programming language of the loaded file.
///
/// Files with an unrecognised extension are treated as Python.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Rust,
    TypeScript,
    JavaScript,
    #[default]
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Shell,
    Markdown,
    Json,
    Yaml,
    Toml,
    Html,
    Css,
    Sql,
}

impl CodeLanguage {
    /// Detect language from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => CodeLanguage::Rust,
            "ts" | "tsx" => CodeLanguage::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => CodeLanguage::JavaScript,
            "py" | "pyi" => CodeLanguage::Python,
            "go" => CodeLanguage::Go,
            "java" => CodeLanguage::Java,
            "c" | "h" => CodeLanguage::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => CodeLanguage::Cpp,
            "cs" => CodeLanguage::CSharp,
            "rb" => CodeLanguage::Ruby,
            "sh" | "bash" | "zsh" => CodeLanguage::Shell,
            "md" | "markdown" => CodeLanguage::Markdown,
            "json" => CodeLanguage::Json,
            "yaml" | "yml" => CodeLanguage::Yaml,
            "toml" => CodeLanguage::Toml,
            "html" | "htm" => CodeLanguage::Html,
            "css" => CodeLanguage::Css,
            "sql" => CodeLanguage::Sql,
            _ => CodeLanguage::default(),
        }
    }

    /// Detect language from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Human readable name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            CodeLanguage::Rust => "Rust",
            CodeLanguage::TypeScript => "TypeScript",
            CodeLanguage::JavaScript => "JavaScript",
            CodeLanguage::Python => "Python",
            CodeLanguage::Go => "Go",
            CodeLanguage::Java => "Java",
            CodeLanguage::C => "C",
            CodeLanguage::Cpp => "C++",
            CodeLanguage::CSharp => "C#",
            CodeLanguage::Ruby => "Ruby",
            CodeLanguage::Shell => "shell",
            CodeLanguage::Markdown => "Markdown",
            CodeLanguage::Json => "JSON",
            CodeLanguage::Yaml => "YAML",
            CodeLanguage::Toml => "TOML",
            CodeLanguage::Html => "HTML",
            CodeLanguage::Css => "CSS",
            CodeLanguage::Sql => "SQL",
        }
    }

    /// Tag written after the opening fence
    pub fn fence_tag(&self) -> &'static str {
        match self {
            CodeLanguage::Rust => "rust",
            CodeLanguage::TypeScript => "typescript",
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::Python => "python",
            CodeLanguage::Go => "go",
            CodeLanguage::Java => "java",
            CodeLanguage::C => "c",
            CodeLanguage::Cpp => "cpp",
            CodeLanguage::CSharp => "csharp",
            CodeLanguage::Ruby => "ruby",
            CodeLanguage::Shell => "bash",
            CodeLanguage::Markdown => "markdown",
            CodeLanguage::Json => "json",
            CodeLanguage::Yaml => "yaml",
            CodeLanguage::Toml => "toml",
            CodeLanguage::Html => "html",
            CodeLanguage::Css => "css",
            CodeLanguage::Sql => "sql",
        }
    }

    /// File extension the highlighter looks syntaxes up by
    pub fn syntax_extension(&self) -> &'static str {
        match self {
            CodeLanguage::Rust => "rs",
            CodeLanguage::TypeScript => "ts",
            CodeLanguage::JavaScript => "js",
            CodeLanguage::Python => "py",
            CodeLanguage::Go => "go",
            CodeLanguage::Java => "java",
            CodeLanguage::C => "c",
            CodeLanguage::Cpp => "cpp",
            CodeLanguage::CSharp => "cs",
            CodeLanguage::Ruby => "rb",
            CodeLanguage::Shell => "sh",
            CodeLanguage::Markdown => "md",
            CodeLanguage::Json => "json",
            CodeLanguage::Yaml => "yaml",
            CodeLanguage::Toml => "toml",
            CodeLanguage::Html => "html",
            CodeLanguage::Css => "css",
            CodeLanguage::Sql => "sql",
        }
    }
}
