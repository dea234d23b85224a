//! Mirror of the controller's event log.
//!
//! The controller streams its log in batches (`NextLogEvents`) starting at
//! the id the panel says it expects next. The panel may also append
//! ephemeral entries of its own, such as a lost-link fault; those live
//! only until the next controller batch replaces them.

use common::Timestamp;

use models::{ActiveLogEvents, LogEvent, LogEventCode, LogEventType, NextLogEvents};

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventLog {
    elements: Vec<LogEvent>,
    expected_id: u32,
    session_id: u32,
    total: u32,
    remaining: u32,
    active_ids: Vec<u32>,
    ephemeral_ids: BTreeSet<u32>,
}

impl EventLog {
    pub fn elements(&self) -> &[LogEvent] {
        &self.elements
    }

    /// Id the panel asks the controller for next.
    pub fn expected_id(&self) -> u32 {
        self.expected_id
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Entries the controller still has to send after the last batch.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn active_ids(&self) -> &[u32] {
        &self.active_ids
    }

    pub fn active_events(&self) -> impl Iterator<Item = &LogEvent> {
        self.elements
            .iter()
            .filter(|event| self.active_ids.contains(&event.id))
    }

    pub fn is_ephemeral(&self, id: u32) -> bool {
        self.ephemeral_ids.contains(&id)
    }

    /// Whether an active entry with `code` is present.
    pub fn has_active(&self, code: LogEventCode) -> bool {
        self.active_events().any(|event| event.code == code as i32)
    }

    /// Merge a controller batch.
    ///
    /// Stored entries below the expected id survive unless ephemeral; incoming
    /// entries below the expected id are duplicates and are dropped.
    pub fn apply_next(&mut self, incoming: NextLogEvents) {
        let NextLogEvents {
            total,
            remaining,
            session_id,
            elements,
            ..
        } = incoming;

        if self.elements.is_empty() {
            self.elements = elements;
        } else {
            let expected = self.expected_id;
            let ephemeral = &self.ephemeral_ids;
            self.elements
                .retain(|event| !ephemeral.contains(&event.id) && event.id < expected);
            self.elements
                .extend(elements.into_iter().filter(|event| event.id >= expected));
        }

        self.expected_id = self
            .elements
            .last()
            .map(|event| event.id.saturating_add(1))
            .unwrap_or(0);
        let ephemeral = std::mem::take(&mut self.ephemeral_ids);
        self.active_ids.retain(|id| !ephemeral.contains(id));
        self.session_id = session_id;
        self.total = total;
        self.remaining = remaining;

        debug!(
            "Event log merged: {} entries, expecting id {}",
            self.elements.len(),
            self.expected_id
        );
    }

    /// Replace the controller's active ids. Active ephemeral entries stay
    /// active, and an id present in both lists is kept once.
    pub fn apply_active(&mut self, incoming: ActiveLogEvents) {
        let ephemeral_active = self
            .active_ids
            .iter()
            .copied()
            .filter(|id| self.ephemeral_ids.contains(id))
            .collect::<Vec<_>>();
        self.active_ids = incoming.id;
        for id in ephemeral_active {
            if !self.active_ids.contains(&id) {
                self.active_ids.push(id);
            }
        }
    }

    /// Append a panel-local active entry. Returns its id.
    pub fn add_ephemeral(
        &mut self,
        code: LogEventCode,
        event_type: LogEventType,
        time: Timestamp,
    ) -> u32 {
        let id = self
            .expected_id
            .saturating_add(self.ephemeral_ids.len() as u32);
        self.elements.push(LogEvent {
            id,
            time,
            code: code as i32,
            event_type: event_type as i32,
            ..Default::default()
        });
        self.active_ids.push(id);
        self.ephemeral_ids.insert(id);
        id
    }

    /// Deactivate every ephemeral entry with `code`. Returns how many were cleared.
    pub fn deactivate_ephemeral(&mut self, code: LogEventCode) -> usize {
        let matching: Vec<u32> = self
            .elements
            .iter()
            .filter(|event| self.ephemeral_ids.contains(&event.id) && event.code == code as i32)
            .map(|event| event.id)
            .collect();
        let before = self.active_ids.len();
        self.active_ids.retain(|id| !matching.contains(id));
        before - self.active_ids.len()
    }
}
