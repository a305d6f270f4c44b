// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot, read-only scheduler introspection
//!
//! Produces the normalized picture the store is seeded from. Inspection
//! never mutates the scheduler; the only failure it can surface is a run
//! state outside the known tri-state set, which indicates version skew
//! with the scheduler collaborator.

use crate::adapters::{JobSpec, SchedulerClient};
use crate::summary::{RunState, SchedulerInfo};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from scheduler inspection
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("scheduler reported unknown run state code {0}")]
    UnknownRunState(u32),
}

/// Normalized result of one inspection pass
#[derive(Debug, Clone)]
pub struct Inspection {
    pub jobstores: BTreeMap<String, Option<String>>,
    pub executors: BTreeMap<String, Option<String>>,
    pub info: SchedulerInfo,
    /// Flat job list, populated only when the scheduler has no named
    /// job stores to enumerate through
    pub jobs: Vec<JobSpec>,
}

pub fn inspect<S: SchedulerClient>(scheduler: &S) -> Result<Inspection, InspectError> {
    let jobstores: BTreeMap<String, Option<String>> = scheduler
        .list_jobstores()
        .into_iter()
        .map(|(alias, description)| (alias, Some(description)))
        .collect();

    let executors: BTreeMap<String, Option<String>> = scheduler
        .list_executors()
        .into_iter()
        .map(|(alias, description)| (alias, Some(description)))
        .collect();

    let state_code = scheduler.run_state();
    let state =
        RunState::from_code(state_code).ok_or(InspectError::UnknownRunState(state_code))?;

    let info = SchedulerInfo {
        class: scheduler.class_name(),
        state,
        timezone: scheduler.timezone(),
        jobstore_retry_interval: scheduler.jobstore_retry_interval(),
        defaults: scheduler.job_defaults(),
    };

    let jobs = if jobstores.is_empty() {
        scheduler.get_jobs(None)
    } else {
        Vec::new()
    };

    Ok(Inspection {
        jobstores,
        executors,
        info,
        jobs,
    })
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
