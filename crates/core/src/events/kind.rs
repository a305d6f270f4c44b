// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized event vocabulary
//!
//! Raw scheduler event codes translate into a closed set of named kinds.
//! Keeping the set an enum means the watcher's dispatch is an exhaustive
//! `match`: a kind without a handler fails to compile instead of failing
//! at event-delivery time.

use super::raw::code;
use serde::Serialize;
use std::fmt;

/// A normalized scheduler event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SchedulerStarted,
    SchedulerShutdown,
    SchedulerPaused,
    SchedulerResumed,
    ExecutorAdded,
    ExecutorRemoved,
    JobstoreAdded,
    JobstoreRemoved,
    AllJobsRemoved,
    JobAdded,
    JobRemoved,
    JobModified,
    JobExecuted,
    JobError,
    JobMissed,
    JobSubmitted,
    JobMaxInstances,
}

impl EventKind {
    /// Every kind, in raw-code order.
    pub const ALL: [EventKind; 17] = [
        EventKind::SchedulerStarted,
        EventKind::SchedulerShutdown,
        EventKind::SchedulerPaused,
        EventKind::SchedulerResumed,
        EventKind::ExecutorAdded,
        EventKind::ExecutorRemoved,
        EventKind::JobstoreAdded,
        EventKind::JobstoreRemoved,
        EventKind::AllJobsRemoved,
        EventKind::JobAdded,
        EventKind::JobRemoved,
        EventKind::JobModified,
        EventKind::JobExecuted,
        EventKind::JobError,
        EventKind::JobMissed,
        EventKind::JobSubmitted,
        EventKind::JobMaxInstances,
    ];

    /// Translate a raw scheduler event code. Returns `None` for codes
    /// outside the known set; callers drop those silently.
    pub fn from_raw_code(code: u32) -> Option<Self> {
        match code {
            code::SCHEDULER_STARTED => Some(EventKind::SchedulerStarted),
            code::SCHEDULER_SHUTDOWN => Some(EventKind::SchedulerShutdown),
            code::SCHEDULER_PAUSED => Some(EventKind::SchedulerPaused),
            code::SCHEDULER_RESUMED => Some(EventKind::SchedulerResumed),
            code::EXECUTOR_ADDED => Some(EventKind::ExecutorAdded),
            code::EXECUTOR_REMOVED => Some(EventKind::ExecutorRemoved),
            code::JOBSTORE_ADDED => Some(EventKind::JobstoreAdded),
            code::JOBSTORE_REMOVED => Some(EventKind::JobstoreRemoved),
            code::ALL_JOBS_REMOVED => Some(EventKind::AllJobsRemoved),
            code::JOB_ADDED => Some(EventKind::JobAdded),
            code::JOB_REMOVED => Some(EventKind::JobRemoved),
            code::JOB_MODIFIED => Some(EventKind::JobModified),
            code::JOB_EXECUTED => Some(EventKind::JobExecuted),
            code::JOB_ERROR => Some(EventKind::JobError),
            code::JOB_MISSED => Some(EventKind::JobMissed),
            code::JOB_SUBMITTED => Some(EventKind::JobSubmitted),
            code::JOB_MAX_INSTANCES => Some(EventKind::JobMaxInstances),
            _ => None,
        }
    }

    /// Wire name, as consumers see it in `event_name` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SchedulerStarted => "scheduler_started",
            EventKind::SchedulerShutdown => "scheduler_shutdown",
            EventKind::SchedulerPaused => "scheduler_paused",
            EventKind::SchedulerResumed => "scheduler_resumed",
            EventKind::ExecutorAdded => "executor_added",
            EventKind::ExecutorRemoved => "executor_removed",
            EventKind::JobstoreAdded => "jobstore_added",
            EventKind::JobstoreRemoved => "jobstore_removed",
            EventKind::AllJobsRemoved => "all_jobs_removed",
            EventKind::JobAdded => "job_added",
            EventKind::JobRemoved => "job_removed",
            EventKind::JobModified => "job_modified",
            EventKind::JobExecuted => "job_executed",
            EventKind::JobError => "job_error",
            EventKind::JobMissed => "job_missed",
            EventKind::JobSubmitted => "job_submitted",
            EventKind::JobMaxInstances => "job_max_instances",
        }
    }

    /// Segmented topic for feed subscription patterns ("job:*", "scheduler:**")
    pub fn topic(&self) -> &'static str {
        match self {
            EventKind::SchedulerStarted => "scheduler:started",
            EventKind::SchedulerShutdown => "scheduler:shutdown",
            EventKind::SchedulerPaused => "scheduler:paused",
            EventKind::SchedulerResumed => "scheduler:resumed",
            EventKind::ExecutorAdded => "executor:added",
            EventKind::ExecutorRemoved => "executor:removed",
            EventKind::JobstoreAdded => "jobstore:added",
            EventKind::JobstoreRemoved => "jobstore:removed",
            EventKind::AllJobsRemoved => "job:all_removed",
            EventKind::JobAdded => "job:added",
            EventKind::JobRemoved => "job:removed",
            EventKind::JobModified => "job:modified",
            EventKind::JobExecuted => "job:executed",
            EventKind::JobError => "job:error",
            EventKind::JobMissed => "job:missed",
            EventKind::JobSubmitted => "job:submitted",
            EventKind::JobMaxInstances => "job:max_instances",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
