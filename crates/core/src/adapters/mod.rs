// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler capability contracts and their implementations

mod fake;
mod traced;
mod traits;

#[cfg(test)]
#[path = "fake_tests.rs"]
mod fake_tests;

pub use fake::{FakeScheduler, RecordingListener};
pub use traced::TracedScheduler;
pub use traits::{JobSpec, RawEventSubscriber, SchedulerClient, SchedulerControl, SchedulerError};
