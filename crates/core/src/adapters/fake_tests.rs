// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fake::*;
use super::traits::*;
use crate::events::{code, RawEvent};
use chrono::{DateTime, FixedOffset};
use std::sync::{Arc, Mutex};

fn parse(ts: &str) -> DateTime<FixedOffset> {
    ts.parse().unwrap()
}

#[derive(Default)]
struct CapturingSubscriber {
    events: Mutex<Vec<RawEvent>>,
}

impl CapturingSubscriber {
    fn codes(&self) -> Vec<u32> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.code)
            .collect()
    }
}

impl RawEventSubscriber for CapturingSubscriber {
    fn raw_event(&self, event: &RawEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[test]
fn preloading_emits_no_events() {
    let scheduler = FakeScheduler::new();
    let subscriber = Arc::new(CapturingSubscriber::default());
    scheduler.subscribe(subscriber.clone());

    scheduler.preload_jobstore("default", "MemoryJobStore()");
    scheduler.preload_executor("default", "ThreadPoolExecutor(10)");
    scheduler.preload_job(JobSpec::new("job_1", "Job one"), "default");

    assert!(subscriber.codes().is_empty());
    assert_eq!(scheduler.get_jobs(None).len(), 1);
}

#[test]
fn mutations_emit_matching_codes() {
    let scheduler = FakeScheduler::new();
    let subscriber = Arc::new(CapturingSubscriber::default());
    scheduler.subscribe(subscriber.clone());

    scheduler.add_jobstore("in_memory", "MemoryJobStore()");
    scheduler.add_job(JobSpec::new("job_1", "Job one"), "in_memory");
    scheduler.modify_job("job_1", |spec| spec.name = "Renamed".to_string());
    scheduler.remove_job("job_1").unwrap();
    scheduler.remove_jobstore("in_memory");

    assert_eq!(
        subscriber.codes(),
        vec![
            code::JOBSTORE_ADDED,
            code::JOB_ADDED,
            code::JOB_MODIFIED,
            code::JOB_REMOVED,
            code::JOBSTORE_REMOVED,
        ]
    );
}

#[test]
fn job_events_carry_id_and_store() {
    let scheduler = FakeScheduler::new();
    let subscriber = Arc::new(CapturingSubscriber::default());
    scheduler.subscribe(subscriber.clone());

    scheduler.add_job(JobSpec::new("job_1", "Job one"), "in_memory");

    let events = subscriber.events.lock().unwrap().clone();
    assert_eq!(events[0].job_id.as_deref(), Some("job_1"));
    assert_eq!(events[0].jobstore.as_deref(), Some("in_memory"));
}

#[test]
fn removing_a_jobstore_drops_its_jobs() {
    let scheduler = FakeScheduler::new();
    scheduler.preload_jobstore("a", "MemoryJobStore()");
    scheduler.preload_jobstore("b", "MemoryJobStore()");
    scheduler.preload_job(JobSpec::new("job_a", "A"), "a");
    scheduler.preload_job(JobSpec::new("job_b", "B"), "b");

    scheduler.remove_jobstore("a");

    assert_eq!(scheduler.get_jobs(None).len(), 1);
    assert!(scheduler.get_job("job_a", None).is_none());
    assert!(scheduler.get_job("job_b", None).is_some());
}

#[test]
fn next_fire_time_walks_the_schedule() {
    let scheduler = FakeScheduler::new();
    scheduler.preload_job(JobSpec::new("job_1", "Job one"), "default");
    scheduler.set_fire_times(
        "job_1",
        vec![
            parse("2026-03-01T10:00:00+00:00"),
            parse("2026-03-01T11:00:00+00:00"),
        ],
    );

    let after = parse("2026-03-01T10:00:00+00:00");
    assert_eq!(
        scheduler.next_fire_time("job_1", after),
        Some(parse("2026-03-01T11:00:00+00:00"))
    );
    let after = parse("2026-03-01T11:00:00+00:00");
    assert_eq!(scheduler.next_fire_time("job_1", after), None);
}

#[test]
fn control_operations_change_state_and_report_missing_jobs() {
    let scheduler = FakeScheduler::new();
    assert_eq!(scheduler.run_state(), 1);

    scheduler.pause().unwrap();
    assert_eq!(scheduler.run_state(), 2);
    scheduler.resume().unwrap();
    assert_eq!(scheduler.run_state(), 1);
    scheduler.shutdown(false).unwrap();
    assert_eq!(scheduler.run_state(), 0);

    match scheduler.remove_job("missing") {
        Err(SchedulerError::JobNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected JobNotFound, got {other:?}"),
    }
}

#[test]
fn pause_and_run_job_drive_the_next_run_time() {
    let scheduler = FakeScheduler::new();
    let spec = JobSpec::new("job_1", "Job one")
        .with_next_run_time(parse("2026-03-01T10:00:00+00:00"));
    scheduler.preload_job(spec, "default");

    scheduler.pause_job("job_1").unwrap();
    assert_eq!(scheduler.get_job("job_1", None).unwrap().next_run_time, None);

    let now = parse("2026-03-01T09:30:00+00:00");
    scheduler.run_job("job_1", now).unwrap();
    assert_eq!(
        scheduler.get_job("job_1", None).unwrap().next_run_time,
        Some(now)
    );
}

#[test]
fn phantom_executor_add_emits_without_registering() {
    let scheduler = FakeScheduler::new();
    let subscriber = Arc::new(CapturingSubscriber::default());
    scheduler.subscribe(subscriber.clone());

    scheduler.add_executor_phantom("ghost");

    assert_eq!(subscriber.codes(), vec![code::EXECUTOR_ADDED]);
    assert_eq!(scheduler.executor("ghost"), None);
}
