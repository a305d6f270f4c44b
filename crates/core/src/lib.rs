//! sw-core: event-driven mirroring of a job scheduler's live state
//!
//! This crate provides:
//! - Capability traits the scheduler collaborator implements (inspection,
//!   event subscription, control)
//! - Translation of raw scheduler events into a normalized vocabulary
//! - An in-memory, lock-guarded mirror of jobs, job stores, executors and
//!   scheduler status, with bounded per-job event history
//! - Synchronous listener fan-out plus a channel-based event feed for
//!   async consumers such as a web transport

pub mod clock;
pub mod config;

pub mod adapters;
pub mod events;

pub mod inspect;
pub mod job;
pub mod summary;

pub mod notify;
pub mod store;
pub mod watcher;

pub mod control;
pub mod feed;

// Re-exports
pub use clock::{format_ts, Clock, FakeClock, FixedOffsetClock, SystemClock};
pub use config::{ConfigError, WatcherConfig};
pub use events::{code, EventKind, RawEvent};
pub use job::{ExecutionOutcome, JobEvent, JobEventPayload, JobProperties, JobRecord};
pub use summary::{JobDefaults, RunState, SchedulerInfo, SchedulerSummary};

// Re-export adapters
pub use adapters::{
    FakeScheduler, JobSpec, RawEventSubscriber, RecordingListener, SchedulerClient,
    SchedulerControl, SchedulerError, TracedScheduler,
};

// Re-export the watcher surface
pub use inspect::{inspect, InspectError, Inspection};
pub use notify::{
    ExecutorEventInfo, JobEventRecord, JobStoreEventInfo, ListenerRegistry, Notification,
    SchedulerEventInfo, SchedulerEventsListener,
};
pub use store::StateStore;
pub use watcher::SchedulerWatcher;

pub use control::{ControlError, SchedulerCommander};
pub use feed::{EventFeed, EventPattern, FeedMessage, FeedReceiver, SubscriberId, Subscription};
