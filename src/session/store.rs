//! Event store - newest-first, value-deduplicated kill events

use std::collections::HashSet;
use tracing::{debug, info};

use super::Identity;
use crate::event::KillEvent;

/// Ordered set of the relevant kill events seen during one scan session
#[derive(Debug, Default)]
pub struct EventStore {
    /// Sorted by timestamp, newest first
    events: Vec<KillEvent>,
    seen: HashSet<KillEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every relevant, not yet known event and restore the order
    ///
    /// Semantically each new event is prepended, then the whole list is
    /// stably sorted by timestamp descending, so among equal timestamps the
    /// later line comes first. Returns the newly inserted events in input
    /// order.
    pub fn ingest<I>(&mut self, candidates: I, identity: &Identity) -> Vec<KillEvent>
    where
        I: IntoIterator<Item = KillEvent>,
    {
        let mut inserted = Vec::new();

        for event in candidates {
            if !identity.is_relevant(&event) || self.seen.contains(&event) {
                continue;
            }
            info!(
                killed_player = %event.killed_player,
                killer = %event.killer,
                "New kill event detected"
            );
            debug!("Kill event: {:?}", event);
            self.seen.insert(event.clone());
            inserted.push(event);
        }

        if !inserted.is_empty() {
            let previous = std::mem::take(&mut self.events);
            self.events = inserted.iter().rev().cloned().chain(previous).collect();
            self.events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        inserted
    }

    /// Events newest first
    pub fn events(&self) -> &[KillEvent] {
        &self.events
    }

    pub fn contains(&self, event: &KillEvent) -> bool {
        self.seen.contains(event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
