// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener contract and notification fan-out
//!
//! Listeners receive owned notification values, never references into the
//! store. Fan-out iterates a snapshot of the registry so a listener may
//! register or remove listeners from within a callback without upsetting
//! the iteration.

use crate::events::EventKind;
use crate::job::JobEvent;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Scheduler lifecycle notification: name and timestamp only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerEventInfo {
    pub event_name: EventKind,
    pub event_ts: String,
}

/// Job store lifecycle notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStoreEventInfo {
    pub event_name: EventKind,
    pub event_ts: String,
    pub jobstore_name: String,
}

/// Executor lifecycle notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutorEventInfo {
    pub event_name: EventKind,
    pub event_ts: String,
    pub executor_name: String,
}

/// A job event as delivered to listeners: the stored event plus the
/// best-effort list of upcoming fire times computed at dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobEventRecord {
    #[serde(flatten)]
    pub event: JobEvent,
    pub next_run_times: Vec<String>,
}

/// Observer of watcher state changes. Callbacks run synchronously on the
/// thread that received the raw scheduler event.
pub trait SchedulerEventsListener: Send + Sync {
    /// The scheduler's own run state changed
    fn scheduler_event(&self, event: &SchedulerEventInfo);

    /// A job was added, modified, removed, submitted, or finished running
    fn job_event(&self, event: &JobEventRecord);

    /// A job store was added to or removed from the scheduler
    fn jobstore_event(&self, event: &JobStoreEventInfo);

    /// An executor was added to or removed from the scheduler
    fn executor_event(&self, event: &ExecutorEventInfo);
}

/// A notification produced by a store mutation, dispatched after the
/// store lock is released.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Scheduler(SchedulerEventInfo),
    Job(JobEvent),
    JobStore(JobStoreEventInfo),
    Executor(ExecutorEventInfo),
}

/// Ordered, identity-deduplicated set of listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn SchedulerEventsListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the same listener instance is already registered
    pub fn add(&self, listener: Arc<dyn SchedulerEventsListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    pub fn remove(&self, listener: &Arc<dyn SchedulerEventsListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current registry, in registration order
    pub fn snapshot(&self) -> Vec<Arc<dyn SchedulerEventsListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
