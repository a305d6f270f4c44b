// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory mirror of scheduler state
//!
//! One mutex guards the whole store. Every lifecycle operation runs as a
//! `*_locked` method against the guarded inner state, so cascades (a job
//! store arriving with jobs already in it, a removal sweeping its jobs)
//! happen inside a single critical-section acquisition. Mutations return
//! the notifications to dispatch; the caller fans them out after the lock
//! is released, so a slow listener never stalls event delivery.
//!
//! The only calls made while holding the lock are single-item inspection
//! queries back into the scheduler, which are assumed fast.

use crate::adapters::{JobSpec, SchedulerClient};
use crate::events::EventKind;
use crate::inspect::Inspection;
use crate::job::{ExecutionOutcome, JobEvent, JobEventPayload, JobProperties, JobRecord};
use crate::notify::Notification;
use crate::summary::{RunState, SchedulerInfo, SchedulerSummary};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    jobstores: BTreeMap<String, Option<String>>,
    executors: BTreeMap<String, Option<String>>,
    info: SchedulerInfo,
    jobs: BTreeMap<String, JobRecord>,
}

pub struct StateStore<S> {
    scheduler: Arc<S>,
    max_events_per_job: usize,
    inner: Mutex<StoreInner>,
}

impl<S: SchedulerClient> StateStore<S> {
    pub fn new(scheduler: Arc<S>, max_events_per_job: usize) -> Self {
        Self {
            scheduler,
            max_events_per_job,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Install inspection results and register every pre-existing job,
    /// all within the caller's critical section. Notifications are not
    /// produced: seeding happens before any listener can register.
    pub(crate) fn seed_locked(
        &self,
        inner: &mut StoreInner,
        inspection: Inspection,
        init_ts: &str,
    ) {
        inner.jobstores = inspection.jobstores;
        inner.executors = inspection.executors;
        inner.info = inspection.info;

        if inner.jobstores.is_empty() {
            for spec in inspection.jobs {
                let job_id = spec.id.clone();
                self.job_added_locked(inner, &job_id, None, init_ts, Some(spec));
            }
        } else {
            let aliases: Vec<String> = inner.jobstores.keys().cloned().collect();
            for alias in aliases {
                self.jobstore_added_locked(inner, &alias, init_ts);
            }
        }
    }

    /// Track a new job. A no-op when the id is already known, which makes
    /// duplicate "added" notifications racing with startup inspection
    /// harmless.
    pub fn job_added(
        &self,
        job_id: &str,
        jobstore: Option<&str>,
        ts: &str,
        prefetched: Option<JobSpec>,
    ) -> Vec<Notification> {
        let mut inner = self.lock();
        self.job_added_locked(&mut inner, job_id, jobstore, ts, prefetched)
    }

    pub fn job_modified(&self, job_id: &str, jobstore: Option<&str>, ts: &str) -> Vec<Notification> {
        let mut inner = self.lock();
        self.job_modified_locked(&mut inner, job_id, jobstore, ts)
    }

    pub fn job_removed(&self, job_id: &str, ts: &str) -> Vec<Notification> {
        let mut inner = self.lock();
        self.job_removed_locked(&mut inner, job_id, ts)
    }

    pub fn job_execution_event(
        &self,
        job_id: &str,
        jobstore: Option<&str>,
        kind: EventKind,
        ts: &str,
        outcome: ExecutionOutcome,
    ) -> Vec<Notification> {
        let mut inner = self.lock();
        self.job_execution_event_locked(&mut inner, job_id, jobstore, kind, ts, outcome)
    }

    pub fn jobstore_added(&self, alias: &str, ts: &str) -> Vec<Notification> {
        let mut inner = self.lock();
        self.jobstore_added_locked(&mut inner, alias, ts)
    }

    pub fn jobstore_removed(&self, alias: &str, ts: &str) -> Vec<Notification> {
        let mut inner = self.lock();
        self.jobstore_removed_locked(&mut inner, alias, ts)
    }

    pub fn executor_added(&self, alias: &str) {
        let description = self.scheduler.executor(alias);
        if description.is_none() {
            tracing::warn!(alias, "failed to locate executor in scheduler");
        }
        let mut inner = self.lock();
        inner.executors.insert(alias.to_string(), description);
    }

    pub fn executor_removed(&self, alias: &str) {
        let mut inner = self.lock();
        inner.executors.remove(alias);
    }

    pub fn all_jobs_removed(&self, ts: &str) -> Vec<Notification> {
        let mut inner = self.lock();
        let job_ids: Vec<String> = inner.jobs.keys().cloned().collect();
        let mut notifications = Vec::new();
        for job_id in job_ids {
            notifications.extend(self.job_removed_locked(&mut inner, &job_id, ts));
        }
        notifications
    }

    /// Re-read only the run state field, keeping the previous value when
    /// the scheduler reports a code outside the known set.
    pub fn refresh_run_state(&self) {
        let mut inner = self.lock();
        let code = self.scheduler.run_state();
        match RunState::from_code(code) {
            Some(state) => inner.info.state = state,
            None => tracing::warn!(code, "scheduler reported unknown run state code"),
        }
    }

    /// Composite snapshot, taken under one lock acquisition
    pub fn summary(&self) -> SchedulerSummary {
        let inner = self.lock();
        SchedulerSummary {
            executors: inner.executors.clone(),
            jobstores: inner.jobstores.clone(),
            scheduler: inner.info.clone(),
            jobs: inner.jobs.clone(),
        }
    }

    fn job_added_locked(
        &self,
        inner: &mut StoreInner,
        job_id: &str,
        jobstore: Option<&str>,
        ts: &str,
        prefetched: Option<JobSpec>,
    ) -> Vec<Notification> {
        if inner.jobs.contains_key(job_id) {
            return Vec::new();
        }

        let spec = prefetched.or_else(|| self.scheduler.get_job(job_id, jobstore));
        let properties = match spec {
            Some(spec) => JobProperties::from_spec(&spec, jobstore),
            None => {
                tracing::warn!(job_id, "job vanished before its properties could be read");
                JobProperties::placeholder(job_id, jobstore)
            }
        };

        let mut record = JobRecord::new(ts, properties);
        let event = JobEvent {
            job_id: job_id.to_string(),
            event_name: EventKind::JobAdded,
            event_ts: ts.to_string(),
            payload: JobEventPayload::Added {
                added_time: record.added_time.clone(),
                modified_time: record.modified_time.clone(),
                removed_time: None,
                properties: record.properties.clone(),
            },
        };
        record.push_event(event.clone(), self.max_events_per_job);
        inner.jobs.insert(job_id.to_string(), record);

        vec![Notification::Job(event)]
    }

    fn job_modified_locked(
        &self,
        inner: &mut StoreInner,
        job_id: &str,
        jobstore: Option<&str>,
        ts: &str,
    ) -> Vec<Notification> {
        if !inner.jobs.contains_key(job_id) {
            tracing::warn!(job_id, "modification event for untracked job, treating as add");
            return self.job_added_locked(inner, job_id, jobstore, ts, None);
        }

        let fetched = self
            .scheduler
            .get_job(job_id, jobstore)
            .map(|spec| JobProperties::from_spec(&spec, jobstore));
        if fetched.is_none() {
            tracing::warn!(job_id, "job vanished before its properties could be re-read");
        }

        let Some(record) = inner.jobs.get_mut(job_id) else {
            return Vec::new();
        };
        if let Some(properties) = fetched {
            record.properties = properties;
        }
        record.modified_time = ts.to_string();

        let event = JobEvent {
            job_id: job_id.to_string(),
            event_name: EventKind::JobModified,
            event_ts: ts.to_string(),
            payload: JobEventPayload::Modified {
                properties: record.properties.clone(),
            },
        };
        record.push_event(event.clone(), self.max_events_per_job);

        vec![Notification::Job(event)]
    }

    fn job_removed_locked(
        &self,
        inner: &mut StoreInner,
        job_id: &str,
        ts: &str,
    ) -> Vec<Notification> {
        let Some(record) = inner.jobs.get_mut(job_id) else {
            tracing::warn!(job_id, "removal event for untracked job");
            return Vec::new();
        };

        // Last write wins; the record itself is retained.
        record.removed_time = Some(ts.to_string());

        let event = JobEvent {
            job_id: job_id.to_string(),
            event_name: EventKind::JobRemoved,
            event_ts: ts.to_string(),
            payload: JobEventPayload::Removed {},
        };
        record.push_event(event.clone(), self.max_events_per_job);

        vec![Notification::Job(event)]
    }

    fn job_execution_event_locked(
        &self,
        inner: &mut StoreInner,
        job_id: &str,
        jobstore: Option<&str>,
        kind: EventKind,
        ts: &str,
        outcome: ExecutionOutcome,
    ) -> Vec<Notification> {
        let mut notifications = Vec::new();

        // An execution event can outrace the add notification; synthesize
        // the missing transition instead of dropping the event.
        if !inner.jobs.contains_key(job_id) {
            notifications.extend(self.job_added_locked(inner, job_id, jobstore, ts, None));
        }

        let Some(record) = inner.jobs.get_mut(job_id) else {
            return notifications;
        };

        let event = JobEvent {
            job_id: job_id.to_string(),
            event_name: kind,
            event_ts: ts.to_string(),
            payload: JobEventPayload::Execution(outcome),
        };
        record.push_event(event.clone(), self.max_events_per_job);
        notifications.push(Notification::Job(event));

        notifications
    }

    fn jobstore_added_locked(
        &self,
        inner: &mut StoreInner,
        alias: &str,
        ts: &str,
    ) -> Vec<Notification> {
        let mut notifications = Vec::new();

        // Jobs may predate the store's "added" event being observed.
        for spec in self.scheduler.get_jobs(Some(alias)) {
            let job_id = spec.id.clone();
            notifications.extend(self.job_added_locked(inner, &job_id, Some(alias), ts, Some(spec)));
        }

        let description = self.scheduler.jobstore(alias);
        if description.is_none() {
            tracing::warn!(alias, "failed to locate job store in scheduler");
        }
        inner.jobstores.insert(alias.to_string(), description);

        notifications
    }

    fn jobstore_removed_locked(
        &self,
        inner: &mut StoreInner,
        alias: &str,
        ts: &str,
    ) -> Vec<Notification> {
        let affected: Vec<String> = inner
            .jobs
            .iter()
            .filter(|(_, record)| record.properties.jobstore.as_deref() == Some(alias))
            .map(|(job_id, _)| job_id.clone())
            .collect();

        let mut notifications = Vec::new();
        for job_id in affected {
            notifications.extend(self.job_removed_locked(inner, &job_id, ts));
        }

        inner.jobstores.remove(alias);

        notifications
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
