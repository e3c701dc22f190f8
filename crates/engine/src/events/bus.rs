// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out of announced chore events to collaborators
//!
//! Delivery is one-directional: subscribers receive owned events over
//! channels and never call back into the orchestrator. A subscriber whose
//! receiver is gone is dropped on the next publish.

use super::filter::EventFilter;
use chore_core::ChoreEvent;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

pub type EventSender = mpsc::UnboundedSender<ChoreEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ChoreEvent>;

/// Handle for removing a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    filter: EventFilter,
    tx: EventSender,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every announced event the filter admits
    pub fn subscribe(&self, filter: EventFilter) -> (SubscriberId, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        registry.next_id += 1;
        let id = SubscriberId(registry.next_id);
        registry.subscribers.push(Subscriber { id, filter, tx });
        (id, rx)
    }

    /// Receive every announced event until the receiver is dropped
    pub fn watch_all(&self) -> EventReceiver {
        self.subscribe(EventFilter::all()).1
    }

    /// Returns false when the subscriber was already gone
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let before = registry.subscribers.len();
        registry.subscribers.retain(|s| s.id != id);
        registry.subscribers.len() != before
    }

    /// Deliver to matching subscribers; returns how many received the event
    pub fn publish(&self, event: &ChoreEvent) -> usize {
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let before = registry.subscribers.len();
        registry.subscribers.retain(|s| !s.tx.is_closed());
        let dropped = before - registry.subscribers.len();
        if dropped > 0 {
            tracing::debug!(dropped, "removed subscribers without receivers");
        }
        registry
            .subscribers
            .iter()
            .filter(|s| s.filter.matches(event))
            .filter(|s| s.tx.send(event.clone()).is_ok())
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
