// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirrored job state: property snapshots, records, and per-job events

use crate::adapters::JobSpec;
use crate::clock::format_ts;
use crate::events::EventKind;
use serde::Serialize;
use std::collections::VecDeque;

/// Snapshot of a job's configuration as last reported by the scheduler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProperties {
    pub id: String,
    pub name: String,
    pub trigger: String,
    pub jobstore: Option<String>,
    pub executor: String,
    pub func: String,
    pub func_ref: String,
    pub args: String,
    pub kwargs: String,
    pub pending: bool,
    pub coalesce: Option<bool>,
    /// Next scheduled run, as a list of at most one formatted timestamp
    pub next_run_time: Option<Vec<String>>,
    /// Seconds of allowed delay before a run counts as missed
    pub misfire_grace_time: Option<u32>,
    pub max_instances: Option<u32>,
}

impl JobProperties {
    pub fn from_spec(spec: &JobSpec, jobstore: Option<&str>) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            trigger: spec.trigger.clone(),
            jobstore: jobstore.map(str::to_string),
            executor: spec.executor.clone(),
            func: spec.func.clone(),
            func_ref: spec.func_ref.clone(),
            args: spec.args.clone(),
            kwargs: spec.kwargs.clone(),
            pending: spec.pending,
            coalesce: spec.coalesce,
            next_run_time: spec.next_run_time.map(|ts| vec![format_ts(&ts)]),
            misfire_grace_time: spec.misfire_grace_time,
            max_instances: spec.max_instances,
        }
    }

    /// Minimal snapshot for a job that vanished before its properties could
    /// be read. Only identity is known; everything else stays empty.
    pub fn placeholder(job_id: &str, jobstore: Option<&str>) -> Self {
        Self {
            id: job_id.to_string(),
            name: job_id.to_string(),
            trigger: String::new(),
            jobstore: jobstore.map(str::to_string),
            executor: String::new(),
            func: String::new(),
            func_ref: String::new(),
            args: String::new(),
            kwargs: String::new(),
            pending: false,
            coalesce: None,
            next_run_time: None,
            misfire_grace_time: None,
            max_instances: None,
        }
    }
}

/// Outcome fields of an execution-phase event. Absent fields are omitted
/// from the wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_run_time: Option<String>,
}

impl ExecutionOutcome {
    /// Successful run: return value plus the fire time it satisfied
    pub fn executed(retval: Option<String>, scheduled_run_time: Option<String>) -> Self {
        Self {
            retval,
            scheduled_run_time,
            ..Self::default()
        }
    }

    /// Failed run
    pub fn failed(
        retval: Option<String>,
        exception: Option<String>,
        traceback: Option<String>,
        scheduled_run_time: Option<String>,
    ) -> Self {
        Self {
            retval,
            exception,
            traceback,
            scheduled_run_time,
        }
    }

    /// Submission, miss, or max-instances: only the fire time is known
    pub fn scheduled(scheduled_run_time: Option<String>) -> Self {
        Self {
            scheduled_run_time,
            ..Self::default()
        }
    }
}

/// Kind-specific payload of a [`JobEvent`], flattened into the event's
/// wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobEventPayload {
    /// First observation of the job; carries the full record shape
    Added {
        added_time: String,
        modified_time: String,
        removed_time: Option<String>,
        properties: JobProperties,
    },
    /// Properties changed; carries the fresh snapshot
    Modified { properties: JobProperties },
    /// Submission/execution/failure/miss outcome
    Execution(ExecutionOutcome),
    /// Logical removal; no payload beyond the event itself
    Removed {},
}

/// A single occurrence in a job's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobEvent {
    pub job_id: String,
    pub event_name: EventKind,
    pub event_ts: String,
    #[serde(flatten)]
    pub payload: JobEventPayload,
}

/// Everything tracked about one job id. Records are never deleted; removal
/// only sets `removed_time`, so history survives logical deletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub added_time: String,
    pub modified_time: String,
    pub removed_time: Option<String>,
    pub properties: JobProperties,
    pub events: VecDeque<JobEvent>,
}

impl JobRecord {
    pub fn new(ts: &str, properties: JobProperties) -> Self {
        Self {
            added_time: ts.to_string(),
            modified_time: ts.to_string(),
            removed_time: None,
            properties,
            events: VecDeque::new(),
        }
    }

    /// Append to the history, evicting from the oldest end past `max_events`.
    pub(crate) fn push_event(&mut self, event: JobEvent, max_events: usize) {
        self.events.push_back(event);
        while self.events.len() > max_events {
            self.events.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
