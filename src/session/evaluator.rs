//! Display evaluation - decides which stored events reach the display and
//! how they count

use serde::Serialize;
use std::collections::HashSet;

use super::EventStore;
use crate::event::KillEvent;

/// The monitored player and whether its own kills are tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub handle: String,
    pub killer_mode: bool,
}

impl Identity {
    pub fn new(handle: impl Into<String>, killer_mode: bool) -> Self {
        Self {
            handle: handle.into(),
            killer_mode,
        }
    }

    /// An event belongs to the session if the handle died, or, in killer
    /// mode, if the handle was the killer.
    pub fn is_relevant(&self, event: &KillEvent) -> bool {
        event.killed_player == self.handle || (self.killer_mode && event.killer == self.handle)
    }
}

/// Kill and death counters of the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub kills: u32,
    pub deaths: u32,
}

/// Tracks which stored events have already been shown and counted
pub struct SessionEvaluator {
    identity: Identity,
    show_all: bool,
    evaluated: HashSet<KillEvent>,
    counters: Counters,
}

impl SessionEvaluator {
    pub fn new(identity: Identity, show_all: bool) -> Self {
        Self {
            identity,
            show_all,
            evaluated: HashSet::new(),
            counters: Counters::default(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Forget everything shown so far and switch the non-player filter
    pub fn reset(&mut self, show_all: bool) {
        self.show_all = show_all;
        self.evaluated.clear();
        self.counters = Counters::default();
    }

    /// Walk the store newest first and return the events to display now
    ///
    /// Filtered events are not marked as evaluated, so they show up once
    /// `show_all` is switched on.
    pub fn evaluate(&mut self, store: &EventStore) -> Vec<KillEvent> {
        let mut displayed = Vec::new();

        for event in store.events() {
            if self.evaluated.contains(event) {
                continue;
            }
            if !self.show_all && event.involves_non_player() {
                continue;
            }

            self.count(event);
            self.evaluated.insert(event.clone());
            displayed.push(event.clone());
        }

        displayed
    }

    fn count(&mut self, event: &KillEvent) {
        let handle_is_killer = event.killer == self.identity.handle;
        if self.identity.killer_mode && handle_is_killer && event.killed_player != self.identity.handle
        {
            self.counters.kills += 1;
        } else {
            // Includes self-kills in killer mode
            self.counters.deaths += 1;
        }
    }
}
