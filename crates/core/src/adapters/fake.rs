//! Fake scheduler and listener implementations for testing

use super::traits::{
    JobSpec, RawEventSubscriber, SchedulerClient, SchedulerControl, SchedulerError,
};
use crate::events::{code, RawEvent};
use crate::feed::FeedMessage;
use crate::notify::{
    ExecutorEventInfo, JobEventRecord, JobStoreEventInfo, SchedulerEventInfo,
    SchedulerEventsListener,
};
use crate::summary::{JobDefaults, RunState};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

struct FakeJob {
    spec: JobSpec,
    jobstore: String,
    /// Precomputed trigger schedule consulted by `next_fire_time`
    fire_times: Vec<DateTime<FixedOffset>>,
}

struct FakeState {
    class_name: String,
    run_state: RunState,
    /// When set, reported verbatim instead of the real state code
    raw_state_override: Option<u32>,
    timezone: String,
    jobstore_retry_interval: Duration,
    defaults: JobDefaults,
    jobstores: BTreeMap<String, String>,
    executors: BTreeMap<String, String>,
    jobs: Vec<FakeJob>,
    subscribers: Vec<Arc<dyn RawEventSubscriber>>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            class_name: "FakeScheduler".to_string(),
            run_state: RunState::Running,
            raw_state_override: None,
            timezone: "UTC".to_string(),
            jobstore_retry_interval: Duration::from_secs(10),
            defaults: JobDefaults::default(),
            jobstores: BTreeMap::new(),
            executors: BTreeMap::new(),
            jobs: Vec::new(),
            subscribers: Vec::new(),
        }
    }
}

/// In-memory scheduler implementing both capability traits.
///
/// State changes go through event-emitting methods mirroring a real
/// scheduler's behavior; `preload_*` methods mutate silently to model
/// state that predates the watcher's subscription.
#[derive(Clone, Default)]
pub struct FakeScheduler {
    state: Arc<Mutex<FakeState>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver an event to every subscriber, outside the state lock so
    /// subscribers may call back into the scheduler.
    fn emit(&self, event: RawEvent) {
        let subscribers = self.lock().subscribers.clone();
        for subscriber in &subscribers {
            subscriber.raw_event(&event);
        }
    }

    pub fn set_timezone(&self, timezone: impl Into<String>) {
        self.lock().timezone = timezone.into();
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Report this code from `run_state` until cleared, valid or not
    pub fn set_raw_state_override(&self, code: Option<u32>) {
        self.lock().raw_state_override = code;
    }

    /// Register a job store without emitting an event
    pub fn preload_jobstore(&self, alias: impl Into<String>, description: impl Into<String>) {
        self.lock().jobstores.insert(alias.into(), description.into());
    }

    /// Register an executor without emitting an event
    pub fn preload_executor(&self, alias: impl Into<String>, description: impl Into<String>) {
        self.lock().executors.insert(alias.into(), description.into());
    }

    /// Insert a job without emitting an event
    pub fn preload_job(&self, spec: JobSpec, jobstore: impl Into<String>) {
        self.lock().jobs.push(FakeJob {
            spec,
            jobstore: jobstore.into(),
            fire_times: Vec::new(),
        });
    }

    /// Set the trigger schedule consulted by `next_fire_time`
    pub fn set_fire_times(&self, job_id: &str, fire_times: Vec<DateTime<FixedOffset>>) {
        let mut state = self.lock();
        if let Some(job) = state.jobs.iter_mut().find(|j| j.spec.id == job_id) {
            job.fire_times = fire_times;
        }
    }

    pub fn add_jobstore(&self, alias: &str, description: impl Into<String>) {
        self.lock().jobstores.insert(alias.to_string(), description.into());
        self.emit(RawEvent::for_alias(code::JOBSTORE_ADDED, alias));
    }

    /// Drop the store and its jobs, as a real scheduler does; observers
    /// only ever see the store-level event.
    pub fn remove_jobstore(&self, alias: &str) {
        {
            let mut state = self.lock();
            state.jobstores.remove(alias);
            state.jobs.retain(|j| j.jobstore != alias);
        }
        self.emit(RawEvent::for_alias(code::JOBSTORE_REMOVED, alias));
    }

    pub fn add_executor(&self, alias: &str, description: impl Into<String>) {
        self.lock().executors.insert(alias.to_string(), description.into());
        self.emit(RawEvent::for_alias(code::EXECUTOR_ADDED, alias));
    }

    /// Emit an executor-added event without registering the executor,
    /// simulating a lookup race with a concurrent removal.
    pub fn add_executor_phantom(&self, alias: &str) {
        self.emit(RawEvent::for_alias(code::EXECUTOR_ADDED, alias));
    }

    pub fn remove_executor(&self, alias: &str) {
        self.lock().executors.remove(alias);
        self.emit(RawEvent::for_alias(code::EXECUTOR_REMOVED, alias));
    }

    pub fn add_job(&self, spec: JobSpec, jobstore: &str) {
        let job_id = spec.id.clone();
        self.lock().jobs.push(FakeJob {
            spec,
            jobstore: jobstore.to_string(),
            fire_times: Vec::new(),
        });
        self.emit(RawEvent::for_job(code::JOB_ADDED, job_id, Some(jobstore)));
    }

    /// Apply a mutation to the job's spec and emit a modification event
    pub fn modify_job(&self, job_id: &str, mutate: impl FnOnce(&mut JobSpec)) -> bool {
        let jobstore = {
            let mut state = self.lock();
            match state.jobs.iter_mut().find(|j| j.spec.id == job_id) {
                Some(job) => {
                    mutate(&mut job.spec);
                    Some(job.jobstore.clone())
                }
                None => None,
            }
        };
        match jobstore {
            Some(jobstore) => {
                self.emit(RawEvent::for_job(
                    code::JOB_MODIFIED,
                    job_id,
                    Some(&jobstore),
                ));
                true
            }
            None => false,
        }
    }

    pub fn remove_all_jobs(&self) {
        self.lock().jobs.clear();
        self.emit(RawEvent::new(code::ALL_JOBS_REMOVED));
    }

    fn jobstore_of(&self, job_id: &str) -> Option<String> {
        self.lock()
            .jobs
            .iter()
            .find(|j| j.spec.id == job_id)
            .map(|j| j.jobstore.clone())
    }

    pub fn submit_job(&self, job_id: &str, scheduled: DateTime<FixedOffset>) {
        let jobstore = self.jobstore_of(job_id);
        self.emit(
            RawEvent::for_job(code::JOB_SUBMITTED, job_id, jobstore.as_deref())
                .with_scheduled_run_time(scheduled),
        );
    }

    pub fn finish_job(&self, job_id: &str, retval: &str, scheduled: DateTime<FixedOffset>) {
        let jobstore = self.jobstore_of(job_id);
        self.emit(
            RawEvent::for_job(code::JOB_EXECUTED, job_id, jobstore.as_deref())
                .with_retval(retval)
                .with_scheduled_run_time(scheduled),
        );
    }

    pub fn fail_job(
        &self,
        job_id: &str,
        exception: &str,
        traceback: &str,
        scheduled: DateTime<FixedOffset>,
    ) {
        let jobstore = self.jobstore_of(job_id);
        self.emit(
            RawEvent::for_job(code::JOB_ERROR, job_id, jobstore.as_deref())
                .with_failure(exception, traceback)
                .with_scheduled_run_time(scheduled),
        );
    }

    pub fn miss_job(&self, job_id: &str, scheduled: DateTime<FixedOffset>) {
        let jobstore = self.jobstore_of(job_id);
        self.emit(
            RawEvent::for_job(code::JOB_MISSED, job_id, jobstore.as_deref())
                .with_scheduled_run_time(scheduled),
        );
    }

    pub fn overrun_job(&self, job_id: &str, scheduled: DateTime<FixedOffset>) {
        let jobstore = self.jobstore_of(job_id);
        self.emit(
            RawEvent::for_job(code::JOB_MAX_INSTANCES, job_id, jobstore.as_deref())
                .with_scheduled_run_time(scheduled),
        );
    }

    /// Deliver an arbitrary raw event, for driving edge cases directly
    pub fn deliver(&self, event: RawEvent) {
        self.emit(event);
    }
}

impl SchedulerClient for FakeScheduler {
    fn class_name(&self) -> String {
        self.lock().class_name.clone()
    }

    fn run_state(&self) -> u32 {
        let state = self.lock();
        state
            .raw_state_override
            .unwrap_or_else(|| state.run_state.code())
    }

    fn timezone(&self) -> String {
        self.lock().timezone.clone()
    }

    fn jobstore_retry_interval(&self) -> Duration {
        self.lock().jobstore_retry_interval
    }

    fn job_defaults(&self) -> JobDefaults {
        self.lock().defaults.clone()
    }

    fn list_jobstores(&self) -> Vec<(String, String)> {
        self.lock()
            .jobstores
            .iter()
            .map(|(alias, description)| (alias.clone(), description.clone()))
            .collect()
    }

    fn list_executors(&self) -> Vec<(String, String)> {
        self.lock()
            .executors
            .iter()
            .map(|(alias, description)| (alias.clone(), description.clone()))
            .collect()
    }

    fn jobstore(&self, alias: &str) -> Option<String> {
        self.lock().jobstores.get(alias).cloned()
    }

    fn executor(&self, alias: &str) -> Option<String> {
        self.lock().executors.get(alias).cloned()
    }

    fn get_jobs(&self, jobstore: Option<&str>) -> Vec<JobSpec> {
        self.lock()
            .jobs
            .iter()
            .filter(|j| jobstore.map_or(true, |alias| j.jobstore == alias))
            .map(|j| j.spec.clone())
            .collect()
    }

    fn get_job(&self, job_id: &str, jobstore: Option<&str>) -> Option<JobSpec> {
        self.lock()
            .jobs
            .iter()
            .find(|j| j.spec.id == job_id && jobstore.map_or(true, |alias| j.jobstore == alias))
            .map(|j| j.spec.clone())
    }

    fn next_fire_time(
        &self,
        job_id: &str,
        after: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.lock()
            .jobs
            .iter()
            .find(|j| j.spec.id == job_id)?
            .fire_times
            .iter()
            .find(|ts| **ts > after)
            .copied()
    }

    fn subscribe(&self, subscriber: Arc<dyn RawEventSubscriber>) {
        self.lock().subscribers.push(subscriber);
    }
}

impl SchedulerControl for FakeScheduler {
    fn start(&self) -> Result<(), SchedulerError> {
        self.lock().run_state = RunState::Running;
        self.emit(RawEvent::new(code::SCHEDULER_STARTED));
        Ok(())
    }

    fn shutdown(&self, _wait: bool) -> Result<(), SchedulerError> {
        self.lock().run_state = RunState::Stopped;
        self.emit(RawEvent::new(code::SCHEDULER_SHUTDOWN));
        Ok(())
    }

    fn pause(&self) -> Result<(), SchedulerError> {
        self.lock().run_state = RunState::Paused;
        self.emit(RawEvent::new(code::SCHEDULER_PAUSED));
        Ok(())
    }

    fn resume(&self) -> Result<(), SchedulerError> {
        self.lock().run_state = RunState::Running;
        self.emit(RawEvent::new(code::SCHEDULER_RESUMED));
        Ok(())
    }

    fn pause_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        if !self.modify_job(job_id, |spec| spec.next_run_time = None) {
            return Err(SchedulerError::JobNotFound(job_id.to_string()));
        }
        Ok(())
    }

    fn resume_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        let next = {
            let state = self.lock();
            match state.jobs.iter().find(|j| j.spec.id == job_id) {
                Some(job) => job.fire_times.first().copied(),
                None => return Err(SchedulerError::JobNotFound(job_id.to_string())),
            }
        };
        self.modify_job(job_id, |spec| spec.next_run_time = next);
        Ok(())
    }

    fn remove_job(&self, job_id: &str) -> Result<(), SchedulerError> {
        let jobstore = {
            let mut state = self.lock();
            let Some(index) = state.jobs.iter().position(|j| j.spec.id == job_id) else {
                return Err(SchedulerError::JobNotFound(job_id.to_string()));
            };
            state.jobs.remove(index).jobstore
        };
        self.emit(RawEvent::for_job(code::JOB_REMOVED, job_id, Some(&jobstore)));
        Ok(())
    }

    fn run_job(&self, job_id: &str, run_time: DateTime<FixedOffset>) -> Result<(), SchedulerError> {
        if !self.modify_job(job_id, |spec| spec.next_run_time = Some(run_time)) {
            return Err(SchedulerError::JobNotFound(job_id.to_string()));
        }
        Ok(())
    }
}

/// Listener that records every notification it receives
#[derive(Default)]
pub struct RecordingListener {
    messages: Mutex<Vec<FeedMessage>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<FeedMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Job events only, as (job id, wire event name) pairs
    pub fn job_events(&self) -> Vec<(String, String)> {
        self.messages()
            .into_iter()
            .filter_map(|message| match message {
                FeedMessage::Job(record) => Some((
                    record.event.job_id.clone(),
                    record.event.event_name.as_str().to_string(),
                )),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn push(&self, message: FeedMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

impl SchedulerEventsListener for RecordingListener {
    fn scheduler_event(&self, event: &SchedulerEventInfo) {
        self.push(FeedMessage::Scheduler(event.clone()));
    }

    fn job_event(&self, event: &JobEventRecord) {
        self.push(FeedMessage::Job(Box::new(event.clone())));
    }

    fn jobstore_event(&self, event: &JobStoreEventInfo) {
        self.push(FeedMessage::JobStore(event.clone()));
    }

    fn executor_event(&self, event: &ExecutorEventInfo) {
        self.push(FeedMessage::Executor(event.clone()));
    }
}
