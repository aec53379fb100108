// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

use crate::config::Settings;

/// Juno - chat with a local model and edit files from your terminal
#[derive(Parser, Debug)]
#[command(name = "juno")]
#[command(version, about = "Chat with a local model and edit files from your terminal")]
pub struct Cli {
    /// Working directory (defaults to current)
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// GGUF model to load (overrides MODEL_PATH)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Wait for complete responses instead of streaming them
    #[arg(long)]
    pub no_stream: bool,

    /// Print the resolved settings as JSON and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply flags on top of settings resolved from the environment
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(ref model) = self.model {
            settings.model.model_path = model.clone();
        }
        if self.no_stream {
            settings.generation.stream = false;
        }
    }

    /// Log filter directive for the verbosity level
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "juno=debug",
            _ => "juno=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["juno"]);
        assert_eq!(cli.verbose, 0);
        assert!(cli.directory.is_none());
        assert!(cli.model.is_none());
        assert!(!cli.no_stream);
        assert!(!cli.show_config);
    }

    #[test]
    fn test_cli_verbose_multiple() {
        let cli = Cli::parse_from(["juno", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_directive(), "juno=trace");
    }

    #[test]
    fn test_cli_directory_short() {
        let cli = Cli::parse_from(["juno", "-C", "/some/path"]);
        assert_eq!(cli.directory, Some(PathBuf::from("/some/path")));
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let cli = Cli::parse_from(["juno", "--model", "/m/x.gguf", "--no-stream"]);
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.model.model_path, PathBuf::from("/m/x.gguf"));
        assert!(!settings.generation.stream);
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let cli = Cli::parse_from(["juno"]);
        let mut settings = Settings::default();
        let before = settings.model.model_path.clone();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.model.model_path, before);
        assert!(settings.generation.stream);
    }
}
