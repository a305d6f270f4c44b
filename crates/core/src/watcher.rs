// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler watcher: event-driven state mirroring with fan-out
//!
//! Construction subscribes to the scheduler's full raw event stream, then
//! inspects and seeds the store, all inside one critical section: an event
//! delivered concurrently with construction queues on the store lock and
//! is applied only after seeding settles. From then on every raw event is
//! translated, timestamped, dispatched to the store, and the resulting
//! notifications are fanned out to listeners.

use crate::adapters::{RawEventSubscriber, SchedulerClient};
use crate::clock::{format_ts, Clock, SystemClock};
use crate::config::WatcherConfig;
use crate::events::{EventKind, RawEvent};
use crate::inspect::{inspect, InspectError};
use crate::job::ExecutionOutcome;
use crate::notify::{
    ExecutorEventInfo, JobEventRecord, JobStoreEventInfo, ListenerRegistry, Notification,
    SchedulerEventInfo, SchedulerEventsListener,
};
use crate::store::StateStore;
use crate::summary::SchedulerSummary;
use std::sync::Arc;

pub struct SchedulerWatcher<S, C = SystemClock> {
    scheduler: Arc<S>,
    store: StateStore<S>,
    listeners: ListenerRegistry,
    clock: C,
    config: WatcherConfig,
}

impl<S: SchedulerClient> SchedulerWatcher<S, SystemClock> {
    /// Watch `scheduler` using the host-local system clock
    pub fn new(scheduler: Arc<S>, config: WatcherConfig) -> Result<Arc<Self>, InspectError> {
        Self::with_clock(scheduler, SystemClock, config)
    }
}

impl<S: SchedulerClient, C: Clock> SchedulerWatcher<S, C> {
    /// Watch `scheduler`, timestamping events with `clock`. Pick a clock
    /// aligned with the scheduler's configured timezone.
    pub fn with_clock(
        scheduler: Arc<S>,
        clock: C,
        config: WatcherConfig,
    ) -> Result<Arc<Self>, InspectError> {
        let store = StateStore::new(Arc::clone(&scheduler), config.max_events_per_job);
        let watcher = Arc::new(Self {
            scheduler,
            store,
            listeners: ListenerRegistry::new(),
            clock,
            config,
        });

        {
            let mut inner = watcher.store.lock();
            let subscriber: Arc<dyn RawEventSubscriber> = watcher.clone();
            watcher.scheduler.subscribe(subscriber);
            let inspection = inspect(watcher.scheduler.as_ref())?;
            let init_ts = format_ts(&watcher.clock.now());
            watcher.store.seed_locked(&mut inner, inspection, &init_ts);
        }

        Ok(watcher)
    }

    /// Register a listener unless the same instance already is
    pub fn add_listener(&self, listener: Arc<dyn SchedulerEventsListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn SchedulerEventsListener>) {
        self.listeners.remove(listener);
    }

    /// Internally consistent composite snapshot for initializing a newly
    /// connected observer
    pub fn scheduler_summary(&self) -> SchedulerSummary {
        self.store.summary()
    }

    /// Apply one raw scheduler event. Runs synchronously on the calling
    /// thread; unrecognized codes are dropped.
    pub fn process_event(&self, event: &RawEvent) {
        let Some(kind) = EventKind::from_raw_code(event.code) else {
            return;
        };
        let event_ts = format_ts(&self.clock.now());
        let notifications = self.dispatch(kind, event, &event_ts);
        self.fan_out(notifications);
    }

    fn dispatch(&self, kind: EventKind, event: &RawEvent, ts: &str) -> Vec<Notification> {
        match kind {
            EventKind::SchedulerStarted
            | EventKind::SchedulerShutdown
            | EventKind::SchedulerPaused
            | EventKind::SchedulerResumed => {
                self.store.refresh_run_state();
                vec![Notification::Scheduler(SchedulerEventInfo {
                    event_name: kind,
                    event_ts: ts.to_string(),
                })]
            }

            EventKind::ExecutorAdded => {
                let Some(alias) = self.required_alias(kind, event) else {
                    return Vec::new();
                };
                self.store.executor_added(alias);
                vec![Notification::Executor(ExecutorEventInfo {
                    event_name: kind,
                    event_ts: ts.to_string(),
                    executor_name: alias.to_string(),
                })]
            }

            EventKind::ExecutorRemoved => {
                let Some(alias) = self.required_alias(kind, event) else {
                    return Vec::new();
                };
                self.store.executor_removed(alias);
                vec![Notification::Executor(ExecutorEventInfo {
                    event_name: kind,
                    event_ts: ts.to_string(),
                    executor_name: alias.to_string(),
                })]
            }

            EventKind::JobstoreAdded => {
                let Some(alias) = self.required_alias(kind, event) else {
                    return Vec::new();
                };
                let mut notifications = self.store.jobstore_added(alias, ts);
                notifications.push(Notification::JobStore(JobStoreEventInfo {
                    event_name: kind,
                    event_ts: ts.to_string(),
                    jobstore_name: alias.to_string(),
                }));
                notifications
            }

            EventKind::JobstoreRemoved => {
                let Some(alias) = self.required_alias(kind, event) else {
                    return Vec::new();
                };
                let mut notifications = self.store.jobstore_removed(alias, ts);
                notifications.push(Notification::JobStore(JobStoreEventInfo {
                    event_name: kind,
                    event_ts: ts.to_string(),
                    jobstore_name: alias.to_string(),
                }));
                notifications
            }

            EventKind::AllJobsRemoved => self.store.all_jobs_removed(ts),

            EventKind::JobAdded => {
                let Some(job_id) = self.required_job_id(kind, event) else {
                    return Vec::new();
                };
                self.store
                    .job_added(job_id, event.jobstore.as_deref(), ts, None)
            }

            EventKind::JobRemoved => {
                let Some(job_id) = self.required_job_id(kind, event) else {
                    return Vec::new();
                };
                self.store.job_removed(job_id, ts)
            }

            EventKind::JobModified => {
                let Some(job_id) = self.required_job_id(kind, event) else {
                    return Vec::new();
                };
                self.store
                    .job_modified(job_id, event.jobstore.as_deref(), ts)
            }

            EventKind::JobExecuted => self.execution(kind, event, ts, |event| {
                ExecutionOutcome::executed(event.retval.clone(), Self::first_scheduled(event))
            }),

            EventKind::JobError => self.execution(kind, event, ts, |event| {
                ExecutionOutcome::failed(
                    event.retval.clone(),
                    event.exception.clone(),
                    event.traceback.clone(),
                    Self::first_scheduled(event),
                )
            }),

            EventKind::JobMissed | EventKind::JobSubmitted | EventKind::JobMaxInstances => self
                .execution(kind, event, ts, |event| {
                    ExecutionOutcome::scheduled(Self::first_scheduled(event))
                }),
        }
    }

    fn execution(
        &self,
        kind: EventKind,
        event: &RawEvent,
        ts: &str,
        outcome: impl FnOnce(&RawEvent) -> ExecutionOutcome,
    ) -> Vec<Notification> {
        let Some(job_id) = self.required_job_id(kind, event) else {
            return Vec::new();
        };
        self.store.job_execution_event(
            job_id,
            event.jobstore.as_deref(),
            kind,
            ts,
            outcome(event),
        )
    }

    fn first_scheduled(event: &RawEvent) -> Option<String> {
        event.scheduled_run_times.first().map(format_ts)
    }

    fn required_alias<'e>(&self, kind: EventKind, event: &'e RawEvent) -> Option<&'e str> {
        let alias = event.alias.as_deref();
        if alias.is_none() {
            tracing::warn!(kind = %kind, "dropping event with no alias");
        }
        alias
    }

    fn required_job_id<'e>(&self, kind: EventKind, event: &'e RawEvent) -> Option<&'e str> {
        let job_id = event.job_id.as_deref();
        if job_id.is_none() {
            tracing::warn!(kind = %kind, "dropping event with no job id");
        }
        job_id
    }

    fn fan_out(&self, notifications: Vec<Notification>) {
        if notifications.is_empty() {
            return;
        }
        let listeners = self.listeners.snapshot();
        for notification in notifications {
            match notification {
                Notification::Job(event) => {
                    let record = JobEventRecord {
                        next_run_times: self.upcoming_run_times(&event.job_id),
                        event,
                    };
                    for listener in &listeners {
                        listener.job_event(&record);
                    }
                }
                Notification::Scheduler(info) => {
                    for listener in &listeners {
                        listener.scheduler_event(&info);
                    }
                }
                Notification::JobStore(info) => {
                    for listener in &listeners {
                        listener.jobstore_event(&info);
                    }
                }
                Notification::Executor(info) => {
                    for listener in &listeners {
                        listener.executor_event(&info);
                    }
                }
            }
        }
    }

    /// Walk the job's trigger forward from its current next run time,
    /// collecting at most the configured number of upcoming fire times.
    /// Best-effort: a job removed in the meantime yields an empty list,
    /// an exhausted trigger a shorter one.
    fn upcoming_run_times(&self, job_id: &str) -> Vec<String> {
        let mut run_times = Vec::new();
        let Some(job) = self.scheduler.get_job(job_id, None) else {
            return run_times;
        };
        let mut next = job.next_run_time;
        while let Some(run_time) = next {
            if run_times.len() >= self.config.upcoming_run_times {
                break;
            }
            run_times.push(format_ts(&run_time));
            next = self.scheduler.next_fire_time(job_id, run_time);
        }
        run_times
    }
}

impl<S: SchedulerClient, C: Clock> RawEventSubscriber for SchedulerWatcher<S, C> {
    fn raw_event(&self, event: &RawEvent) {
        self.process_event(event);
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
