// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;
use yare::parameterized;

#[parameterized(
    scheduler_started = { code::SCHEDULER_STARTED, EventKind::SchedulerStarted },
    scheduler_shutdown = { code::SCHEDULER_SHUTDOWN, EventKind::SchedulerShutdown },
    scheduler_paused = { code::SCHEDULER_PAUSED, EventKind::SchedulerPaused },
    scheduler_resumed = { code::SCHEDULER_RESUMED, EventKind::SchedulerResumed },
    executor_added = { code::EXECUTOR_ADDED, EventKind::ExecutorAdded },
    executor_removed = { code::EXECUTOR_REMOVED, EventKind::ExecutorRemoved },
    jobstore_added = { code::JOBSTORE_ADDED, EventKind::JobstoreAdded },
    jobstore_removed = { code::JOBSTORE_REMOVED, EventKind::JobstoreRemoved },
    all_jobs_removed = { code::ALL_JOBS_REMOVED, EventKind::AllJobsRemoved },
    job_added = { code::JOB_ADDED, EventKind::JobAdded },
    job_removed = { code::JOB_REMOVED, EventKind::JobRemoved },
    job_modified = { code::JOB_MODIFIED, EventKind::JobModified },
    job_executed = { code::JOB_EXECUTED, EventKind::JobExecuted },
    job_error = { code::JOB_ERROR, EventKind::JobError },
    job_missed = { code::JOB_MISSED, EventKind::JobMissed },
    job_submitted = { code::JOB_SUBMITTED, EventKind::JobSubmitted },
    job_max_instances = { code::JOB_MAX_INSTANCES, EventKind::JobMaxInstances },
)]
fn translates_known_codes(raw: u32, expected: EventKind) {
    assert_eq!(EventKind::from_raw_code(raw), Some(expected));
}

#[parameterized(
    zero = { 0 },
    past_the_table = { 1 << 17 },
    combined_mask = { code::JOB_ADDED | code::JOB_REMOVED },
)]
fn unknown_codes_do_not_translate(raw: u32) {
    assert_eq!(EventKind::from_raw_code(raw), None);
}

#[test]
fn translation_covers_every_kind() {
    let translated: HashSet<EventKind> = (0..32)
        .filter_map(|bit| EventKind::from_raw_code(1 << bit))
        .collect();
    assert_eq!(translated.len(), EventKind::ALL.len());
    for kind in EventKind::ALL {
        assert!(translated.contains(&kind), "no raw code maps to {kind}");
    }
}

#[test]
fn all_mask_covers_exactly_the_known_codes() {
    let mut mask = 0u32;
    for bit in 0..32 {
        if EventKind::from_raw_code(1 << bit).is_some() {
            mask |= 1 << bit;
        }
    }
    assert_eq!(mask, code::ALL);
}

#[test]
fn wire_names_match_display() {
    for kind in EventKind::ALL {
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn wire_names_serialize_as_snake_case() {
    let json = serde_json::to_string(&EventKind::JobMaxInstances).unwrap();
    assert_eq!(json, "\"job_max_instances\"");
    let json = serde_json::to_string(&EventKind::SchedulerStarted).unwrap();
    assert_eq!(json, "\"scheduler_started\"");
}

#[test]
fn topics_are_segmented_by_category() {
    assert_eq!(EventKind::JobExecuted.topic(), "job:executed");
    assert_eq!(EventKind::JobstoreRemoved.topic(), "jobstore:removed");
    assert_eq!(EventKind::SchedulerPaused.topic(), "scheduler:paused");
    for kind in EventKind::ALL {
        assert!(kind.topic().contains(':'));
    }
}
