// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watcher configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatcherConfig {
    /// Per-job event history cap; oldest events are evicted first
    pub max_events_per_job: usize,
    /// How many upcoming fire times to attach to job notifications
    pub upcoming_run_times: usize,
    /// How long a control command waits for the command lock
    #[serde(with = "humantime_serde")]
    pub command_timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            max_events_per_job: 100,
            upcoming_run_times: 11,
            command_timeout: Duration::from_secs(1),
        }
    }
}

impl WatcherConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
