// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Juno
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Juno operations
#[derive(Error, Debug)]
pub enum JunoError {
    /// Model call errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The inference engine could not be started
    #[error("Engine unavailable: {0}")]
    Engine(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid UTF-8
    #[error("Could not decode '{}' as UTF-8 text", path.display())]
    Decode { path: PathBuf },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation needed a loaded file
    #[error("No file loaded")]
    NoFileLoaded,

    /// Line editor errors
    #[error("Input error: {0}")]
    Readline(String),

    /// The user interrupted the current operation
    #[error("Interrupted")]
    Cancelled,
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from the server
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Server returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Streaming error
    #[error("Streaming error: {0}")]
    StreamError(String),
}

/// Result type alias for Juno operations
pub type Result<T> = std::result::Result<T, JunoError>;

impl From<rustyline::error::ReadlineError> for JunoError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        JunoError::Readline(err.to_string())
    }
}
