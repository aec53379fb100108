// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{JunoError, Result};

use super::Settings;

impl Settings {
    /// Reject values llama-server or the live view cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.model.context_size == 0 {
            return Err(JunoError::Config(
                "context size must be greater than zero".to_string(),
            ));
        }
        if self.model.threads == 0 {
            return Err(JunoError::Config(
                "thread count must be greater than zero".to_string(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(JunoError::Config(
                "max tokens must be greater than zero".to_string(),
            ));
        }
        if self.ui.refresh_per_second == 0 {
            return Err(JunoError::Config(
                "refresh rate must be greater than zero".to_string(),
            ));
        }
        if self.model.chat_format.trim().is_empty() {
            return Err(JunoError::Config("chat format must not be empty".to_string()));
        }
        Ok(())
    }
}
