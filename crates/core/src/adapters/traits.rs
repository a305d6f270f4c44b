// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability contracts the scheduler collaborator must implement
//!
//! The watcher never reaches into scheduler internals; everything it needs
//! is a designed query on these traits. `SchedulerClient` covers event
//! subscription and read-only introspection, `SchedulerControl` the
//! command surface used by the control layer. A scheduler library lacking
//! such an API gets an adapter that exposes it.

use crate::events::RawEvent;
use crate::summary::JobDefaults;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-job introspection result
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub id: String,
    pub name: String,
    /// Human-readable description of the job's trigger rule
    pub trigger: String,
    /// Alias of the executor that runs this job
    pub executor: String,
    /// Description of the callable
    pub func: String,
    /// Stable reference to the callable
    pub func_ref: String,
    /// Description of positional arguments
    pub args: String,
    /// Description of keyword arguments
    pub kwargs: String,
    /// True while the job awaits its definitive store assignment
    pub pending: bool,
    pub coalesce: Option<bool>,
    pub next_run_time: Option<DateTime<FixedOffset>>,
    pub misfire_grace_time: Option<u32>,
    pub max_instances: Option<u32>,
}

impl JobSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger: String::new(),
            executor: "default".to_string(),
            func: String::new(),
            func_ref: String::new(),
            args: "()".to_string(),
            kwargs: "{}".to_string(),
            pending: false,
            coalesce: Some(true),
            next_run_time: None,
            misfire_grace_time: Some(1),
            max_instances: Some(1),
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = executor.into();
        self
    }

    pub fn with_func(mut self, func: impl Into<String>, func_ref: impl Into<String>) -> Self {
        self.func = func.into();
        self.func_ref = func_ref.into();
        self
    }

    pub fn with_args(mut self, args: impl Into<String>, kwargs: impl Into<String>) -> Self {
        self.args = args.into();
        self.kwargs = kwargs.into();
        self
    }

    pub fn pending(mut self) -> Self {
        self.pending = true;
        self
    }

    pub fn with_coalesce(mut self, coalesce: bool) -> Self {
        self.coalesce = Some(coalesce);
        self
    }

    pub fn with_next_run_time(mut self, next_run_time: DateTime<FixedOffset>) -> Self {
        self.next_run_time = Some(next_run_time);
        self
    }

    pub fn with_misfire_grace_time(mut self, seconds: u32) -> Self {
        self.misfire_grace_time = Some(seconds);
        self
    }

    pub fn with_max_instances(mut self, max_instances: u32) -> Self {
        self.max_instances = Some(max_instances);
        self
    }
}

/// Receiver of the scheduler's raw event stream
pub trait RawEventSubscriber: Send + Sync {
    /// Called synchronously on whatever thread the scheduler delivers from
    fn raw_event(&self, event: &RawEvent);
}

/// Errors from scheduler operations
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("scheduler backend error: {0}")]
    Backend(String),
}

/// Read-only introspection plus event subscription
pub trait SchedulerClient: Send + Sync + 'static {
    /// Implementation class name, for display
    fn class_name(&self) -> String;

    /// Raw run-state code; see [`crate::summary::RunState::from_code`]
    fn run_state(&self) -> u32;

    /// Timezone identifier the scheduler operates in
    fn timezone(&self) -> String;

    fn jobstore_retry_interval(&self) -> Duration;

    fn job_defaults(&self) -> JobDefaults;

    /// All registered job stores as (alias, description) pairs
    fn list_jobstores(&self) -> Vec<(String, String)>;

    /// All registered executors as (alias, description) pairs
    fn list_executors(&self) -> Vec<(String, String)>;

    /// Description of a single job store, if it is still registered
    fn jobstore(&self, alias: &str) -> Option<String>;

    /// Description of a single executor, if it is still registered
    fn executor(&self, alias: &str) -> Option<String>;

    /// Jobs in one store, or every job when `jobstore` is `None`
    fn get_jobs(&self, jobstore: Option<&str>) -> Vec<JobSpec>;

    fn get_job(&self, job_id: &str, jobstore: Option<&str>) -> Option<JobSpec>;

    /// Ask the job's trigger for its next fire time strictly after `after`
    fn next_fire_time(
        &self,
        job_id: &str,
        after: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>>;

    /// Register a subscriber for the full raw event stream
    fn subscribe(&self, subscriber: Arc<dyn RawEventSubscriber>);
}

/// Command surface consumed by the control layer
pub trait SchedulerControl: Send + Sync + 'static {
    fn start(&self) -> Result<(), SchedulerError>;

    fn shutdown(&self, wait: bool) -> Result<(), SchedulerError>;

    fn pause(&self) -> Result<(), SchedulerError>;

    fn resume(&self) -> Result<(), SchedulerError>;

    fn pause_job(&self, job_id: &str) -> Result<(), SchedulerError>;

    fn resume_job(&self, job_id: &str) -> Result<(), SchedulerError>;

    fn remove_job(&self, job_id: &str) -> Result<(), SchedulerError>;

    /// Make the job fire at `run_time`. Implementations nudge a periodic
    /// job's next run time and reschedule a one-shot job outright.
    fn run_job(&self, job_id: &str, run_time: DateTime<FixedOffset>) -> Result<(), SchedulerError>;
}
