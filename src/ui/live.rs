// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Rate limiting for the live view

use std::time::{Duration, Instant};

/// Lets a refresh through at most `per_second` times per second
#[derive(Debug, Clone)]
pub struct RefreshLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshLimiter {
    pub fn new(per_second: u32) -> Self {
        let interval = Duration::from_millis(1000 / u64::from(per_second.max(1)));
        Self {
            interval,
            last: None,
        }
    }

    /// Whether a refresh at `now` is allowed; records it if so
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
