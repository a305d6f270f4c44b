// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced scheduler wrapper for consistent observability

use super::traits::{
    JobSpec, RawEventSubscriber, SchedulerClient, SchedulerControl, SchedulerError,
};
use crate::summary::JobDefaults;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;

/// Wrapper that adds tracing to any scheduler capability implementation
#[derive(Clone)]
pub struct TracedScheduler<S> {
    inner: S,
}

impl<S> TracedScheduler<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SchedulerClient> SchedulerClient for TracedScheduler<S> {
    fn class_name(&self) -> String {
        self.inner.class_name()
    }

    fn run_state(&self) -> u32 {
        let state = self.inner.run_state();
        tracing::debug!(state, "scheduler.run_state");
        state
    }

    fn timezone(&self) -> String {
        self.inner.timezone()
    }

    fn jobstore_retry_interval(&self) -> Duration {
        self.inner.jobstore_retry_interval()
    }

    fn job_defaults(&self) -> JobDefaults {
        self.inner.job_defaults()
    }

    fn list_jobstores(&self) -> Vec<(String, String)> {
        let jobstores = self.inner.list_jobstores();
        tracing::debug!(count = jobstores.len(), "scheduler.list_jobstores");
        jobstores
    }

    fn list_executors(&self) -> Vec<(String, String)> {
        let executors = self.inner.list_executors();
        tracing::debug!(count = executors.len(), "scheduler.list_executors");
        executors
    }

    fn jobstore(&self, alias: &str) -> Option<String> {
        let found = self.inner.jobstore(alias);
        tracing::debug!(alias, found = found.is_some(), "scheduler.jobstore");
        found
    }

    fn executor(&self, alias: &str) -> Option<String> {
        let found = self.inner.executor(alias);
        tracing::debug!(alias, found = found.is_some(), "scheduler.executor");
        found
    }

    fn get_jobs(&self, jobstore: Option<&str>) -> Vec<JobSpec> {
        let jobs = self.inner.get_jobs(jobstore);
        tracing::debug!(jobstore, count = jobs.len(), "scheduler.get_jobs");
        jobs
    }

    fn get_job(&self, job_id: &str, jobstore: Option<&str>) -> Option<JobSpec> {
        let found = self.inner.get_job(job_id, jobstore);
        tracing::debug!(job_id, found = found.is_some(), "scheduler.get_job");
        found
    }

    fn next_fire_time(
        &self,
        job_id: &str,
        after: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.inner.next_fire_time(job_id, after)
    }

    fn subscribe(&self, subscriber: Arc<dyn RawEventSubscriber>) {
        tracing::debug!("scheduler.subscribe");
        self.inner.subscribe(subscriber);
    }
}

impl<S: SchedulerControl> SchedulerControl for TracedScheduler<S> {
    fn start(&self) -> Result<(), SchedulerError> {
        self.traced_command("scheduler.start", || self.inner.start())
    }

    fn shutdown(&self, wait: bool) -> Result<(), SchedulerError> {
        self.traced_command("scheduler.shutdown", || self.inner.shutdown(wait))
    }

    fn pause(&self) -> Result<(), SchedulerError> {
        self.traced_command("scheduler.pause", || self.inner.pause())
    }

    fn resume(&self) -> Result<(), SchedulerError> {
        self.traced_command("scheduler.resume", || self.inner.resume())
    }

    fn pause_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        self.traced_job_command("scheduler.pause_job", job_id, || {
            self.inner.pause_job(job_id)
        })
    }

    fn resume_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        self.traced_job_command("scheduler.resume_job", job_id, || {
            self.inner.resume_job(job_id)
        })
    }

    fn remove_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        self.traced_job_command("scheduler.remove_job", job_id, || {
            self.inner.remove_job(job_id)
        })
    }

    fn run_job(&self, job_id: &str, run_time: DateTime<FixedOffset>) -> Result<(), SchedulerError> {
        self.traced_job_command("scheduler.run_job", job_id, || {
            self.inner.run_job(job_id, run_time)
        })
    }
}

impl<S> TracedScheduler<S> {
    fn traced_command(
        &self,
        op: &'static str,
        run: impl FnOnce() -> Result<(), SchedulerError>,
    ) -> Result<(), SchedulerError> {
        let result = run();
        match &result {
            Ok(()) => tracing::info!(op, "scheduler command succeeded"),
            Err(e) => tracing::error!(op, error = %e, "scheduler command failed"),
        }
        result
    }

    fn traced_job_command(
        &self,
        op: &'static str,
        job_id: &str,
        run: impl FnOnce() -> Result<(), SchedulerError>,
    ) -> Result<(), SchedulerError> {
        let result = run();
        match &result {
            Ok(()) => tracing::info!(op, job_id, "scheduler command succeeded"),
            Err(e) => tracing::error!(op, job_id, error = %e, "scheduler command failed"),
        }
        result
    }
}
