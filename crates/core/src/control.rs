// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized control commands against the scheduler
//!
//! Control operations (pause, resume, run-now, remove) arrive from
//! outward-facing callers and are serialized behind one async mutex so a
//! burst of commands cannot interleave. The lock is acquired with a
//! caller-configured timeout; a caller that cannot get it in time receives
//! [`ControlError::Busy`] instead of queueing indefinitely.

use crate::adapters::{SchedulerControl, SchedulerError};
use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from the control layer
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("timed out waiting for the scheduler command lock")]
    Busy,
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

pub struct SchedulerCommander<S, C = SystemClock> {
    scheduler: Arc<S>,
    clock: C,
    lock: Mutex<()>,
    timeout: Duration,
}

impl<S: SchedulerControl> SchedulerCommander<S, SystemClock> {
    pub fn new(scheduler: Arc<S>, timeout: Duration) -> Self {
        Self::with_clock(scheduler, SystemClock, timeout)
    }
}

impl<S: SchedulerControl, C: Clock> SchedulerCommander<S, C> {
    pub fn with_clock(scheduler: Arc<S>, clock: C, timeout: Duration) -> Self {
        Self {
            scheduler,
            clock,
            lock: Mutex::new(()),
            timeout,
        }
    }

    async fn exec<T>(
        &self,
        command: impl FnOnce() -> Result<T, SchedulerError>,
    ) -> Result<T, ControlError> {
        let _guard = tokio::time::timeout(self.timeout, self.lock.lock())
            .await
            .map_err(|_| ControlError::Busy)?;
        command().map_err(ControlError::from)
    }

    pub async fn start_scheduler(&self) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.start()).await
    }

    /// Stop without waiting for running jobs to finish
    pub async fn stop_scheduler(&self) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.shutdown(false)).await
    }

    pub async fn pause_scheduler(&self) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.pause()).await
    }

    pub async fn resume_scheduler(&self) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.resume()).await
    }

    pub async fn pause_job(&self, job_id: &str) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.pause_job(job_id)).await
    }

    pub async fn resume_job(&self, job_id: &str) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.resume_job(job_id)).await
    }

    pub async fn remove_job(&self, job_id: &str) -> Result<(), ControlError> {
        self.exec(|| self.scheduler.remove_job(job_id)).await
    }

    /// Fire the job at `run_time`, defaulting to now
    pub async fn run_job(
        &self,
        job_id: &str,
        run_time: Option<DateTime<FixedOffset>>,
    ) -> Result<(), ControlError> {
        let when = run_time.unwrap_or_else(|| self.clock.now());
        self.exec(|| self.scheduler.run_job(job_id, when)).await
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
