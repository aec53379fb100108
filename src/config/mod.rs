// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for Juno
//!
//! Resolves settings from the environment and CLI overrides.

pub mod settings;

pub use settings::*;
