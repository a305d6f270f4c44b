// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler-level state: run state, defaults, and the composite snapshot

use crate::job::JobRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The scheduler's tri-state run status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl RunState {
    /// Map a raw status code as reported by the scheduler. Codes outside
    /// the known set return `None`; callers decide whether that is fatal.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(RunState::Stopped),
            1 => Some(RunState::Running),
            2 => Some(RunState::Paused),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            RunState::Stopped => 0,
            RunState::Running => 1,
            RunState::Paused => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Stopped => "stopped",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults the scheduler applies to jobs that do not override them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefaults {
    pub coalesce: bool,
    pub max_instances: u32,
    /// Seconds of allowed delay before a run counts as missed
    pub misfire_grace_time: Option<u32>,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            coalesce: true,
            max_instances: 1,
            misfire_grace_time: Some(1),
        }
    }
}

/// Scalar snapshot of the scheduler itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerInfo {
    /// Implementation class name of the scheduler collaborator
    pub class: String,
    pub state: RunState,
    /// Timezone identifier the scheduler operates in
    pub timezone: String,
    #[serde(with = "humantime_serde")]
    pub jobstore_retry_interval: Duration,
    #[serde(flatten)]
    pub defaults: JobDefaults,
}

impl Default for SchedulerInfo {
    fn default() -> Self {
        Self {
            class: String::new(),
            state: RunState::Stopped,
            timezone: "UTC".to_string(),
            jobstore_retry_interval: Duration::from_secs(10),
            defaults: JobDefaults::default(),
        }
    }
}

/// Internally consistent point-in-time snapshot of the whole mirror,
/// taken under a single lock acquisition. Handed to newly connected
/// observers; holds copies, never references into the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerSummary {
    pub executors: BTreeMap<String, Option<String>>,
    pub jobstores: BTreeMap<String, Option<String>>,
    pub scheduler: SchedulerInfo,
    pub jobs: BTreeMap<String, JobRecord>,
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
