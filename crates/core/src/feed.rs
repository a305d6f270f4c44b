// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event feed bridging listener callbacks to channel subscribers
//!
//! A web transport (or any async consumer) subscribes with a topic
//! pattern and drains messages from its own channel, decoupled from the
//! synchronous fan-out thread.

use crate::events::EventKind;
use crate::notify::{
    ExecutorEventInfo, JobEventRecord, JobStoreEventInfo, SchedulerEventInfo,
    SchedulerEventsListener,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Pattern for matching event topics
/// Supports:
///   - Exact: "scheduler:paused"
///   - Single wildcard: "job:*" matches "job:added", "job:executed"
///   - Category: "job:**" matches all job events
#[derive(Clone, Debug)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Check if this pattern matches a topic
    pub fn matches(&self, topic: &str) -> bool {
        // Empty pattern matches nothing
        if self.0.is_empty() {
            return false;
        }

        if self.0 == "*" || self.0 == "**" {
            return true;
        }

        let pattern_parts: Vec<&str> = self.0.split(':').collect();
        let topic_parts: Vec<&str> = topic.split(':').collect();

        Self::match_segments(&pattern_parts, &topic_parts)
    }

    fn match_segments(pattern: &[&str], topic: &[&str]) -> bool {
        match (pattern.first(), topic.first()) {
            (None, None) => true,
            (Some(&"**"), _) => true, // ** matches everything remaining
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &topic[1..]),
            (Some(p), Some(t)) if *p == *t => Self::match_segments(&pattern[1..], &topic[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    /// Fresh random id for subscribers that don't care about the name
    pub fn generated() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// A subscription to specific topic patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
    pub description: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<EventPattern>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
            description: description.into(),
        }
    }

    /// Subscription to every event, under a generated id
    pub fn firehose(description: impl Into<String>) -> Self {
        Self {
            id: SubscriberId::generated(),
            patterns: vec![EventPattern::new("**")],
            description: description.into(),
        }
    }

    /// Check if any pattern matches the topic
    pub fn matches(&self, topic: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(topic))
    }
}

/// One notification, as seen by feed subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedMessage {
    Scheduler(SchedulerEventInfo),
    Job(Box<JobEventRecord>),
    JobStore(JobStoreEventInfo),
    Executor(ExecutorEventInfo),
}

impl FeedMessage {
    pub fn event_name(&self) -> EventKind {
        match self {
            FeedMessage::Scheduler(event) => event.event_name,
            FeedMessage::Job(record) => record.event.event_name,
            FeedMessage::JobStore(event) => event.event_name,
            FeedMessage::Executor(event) => event.event_name,
        }
    }

    pub fn topic(&self) -> &'static str {
        self.event_name().topic()
    }
}

/// Sender for feed delivery
pub type FeedSender = mpsc::UnboundedSender<FeedMessage>;
/// Receiver for feed delivery
pub type FeedReceiver = mpsc::UnboundedReceiver<FeedMessage>;

/// Routes watcher notifications to matching channel subscribers
pub struct EventFeed {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, FeedSender)>>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to messages matching the subscription's patterns.
    /// Returns the receiver to drain.
    pub fn subscribe(&self, subscription: Subscription) -> FeedReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = subscription.id.clone();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (subscription, tx));

        rx
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.remove(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn list_subscriptions(&self) -> Vec<SubscriberId> {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    /// Publish a message to all matching subscribers. Send failures mean
    /// the receiver hung up; those subscribers are simply skipped.
    pub fn publish(&self, message: FeedMessage) {
        let topic = message.topic();
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (subscription, tx) in subs.values() {
            if subscription.matches(topic) {
                let _ = tx.send(message.clone());
            }
        }
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventFeed {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl SchedulerEventsListener for EventFeed {
    fn scheduler_event(&self, event: &SchedulerEventInfo) {
        self.publish(FeedMessage::Scheduler(event.clone()));
    }

    fn job_event(&self, event: &JobEventRecord) {
        self.publish(FeedMessage::Job(Box::new(event.clone())));
    }

    fn jobstore_event(&self, event: &JobStoreEventInfo) {
        self.publish(FeedMessage::JobStore(event.clone()));
    }

    fn executor_event(&self, event: &ExecutorEventInfo) {
        self.publish(FeedMessage::Executor(event.clone()));
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
